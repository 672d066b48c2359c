//! In-memory fakes of the injected seams, shared by service tests.

use std::collections::{HashMap, VecDeque};
use std::io;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Semaphore;

use crate::upnp::discovery::{DiscoveryError, DiscoveryResult, SsdpSocket, SsdpSocketFactory};
use crate::upnp::http::{HttpError, HttpReply, HttpTransport};

/// One scripted outcome of `recv_from`.
#[derive(Debug, Clone)]
pub enum ScriptedRecv {
    Datagram(String),
    Error,
    Delay(Duration),
}

struct FakeSocketInner {
    script: Mutex<VecDeque<ScriptedRecv>>,
    sent: Mutex<Vec<(Vec<u8>, SocketAddr)>>,
    fail_send: AtomicBool,
}

/// Socket replaying a script, then blocking forever.
#[derive(Clone)]
pub struct FakeSocket {
    inner: Arc<FakeSocketInner>,
}

impl FakeSocket {
    pub fn new(script: Vec<ScriptedRecv>) -> Self {
        Self {
            inner: Arc::new(FakeSocketInner {
                script: Mutex::new(script.into()),
                sent: Mutex::new(Vec::new()),
                fail_send: AtomicBool::new(false),
            }),
        }
    }

    pub fn fail_sends(&self) {
        self.inner.fail_send.store(true, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<(Vec<u8>, SocketAddr)> {
        self.inner.sent.lock().clone()
    }
}

#[async_trait]
impl SsdpSocket for FakeSocket {
    async fn send_to(&self, buf: &[u8], target: SocketAddr) -> io::Result<usize> {
        if self.inner.fail_send.load(Ordering::SeqCst) {
            return Err(io::Error::new(io::ErrorKind::NetworkUnreachable, "scripted"));
        }
        self.inner.sent.lock().push((buf.to_vec(), target));
        Ok(buf.len())
    }

    async fn recv_from(&self, buf: &mut [u8]) -> io::Result<(usize, SocketAddr)> {
        let from = SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::new(10, 0, 0, 2), 1900));
        loop {
            let next = self.inner.script.lock().pop_front();
            match next {
                Some(ScriptedRecv::Delay(d)) => tokio::time::sleep(d).await,
                Some(ScriptedRecv::Datagram(text)) => {
                    let n = text.len().min(buf.len());
                    buf[..n].copy_from_slice(&text.as_bytes()[..n]);
                    return Ok((n, from));
                }
                Some(ScriptedRecv::Error) => {
                    return Err(io::Error::new(io::ErrorKind::ConnectionReset, "scripted"))
                }
                None => std::future::pending::<()>().await,
            }
        }
    }
}

/// Hands out clones of one [`FakeSocket`] and counts opens.
pub struct FakeSocketFactory {
    socket: FakeSocket,
    opened: AtomicUsize,
    fail: AtomicBool,
}

impl FakeSocketFactory {
    pub fn new(socket: FakeSocket) -> Self {
        Self {
            socket,
            opened: AtomicUsize::new(0),
            fail: AtomicBool::new(false),
        }
    }

    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn fail_opens(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }
}

impl SsdpSocketFactory for FakeSocketFactory {
    fn open(&self) -> DiscoveryResult<Box<dyn SsdpSocket>> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(DiscoveryError::SocketBind(io::Error::new(
                io::ErrorKind::AddrInUse,
                "scripted",
            )));
        }
        Ok(Box::new(self.socket.clone()))
    }
}

/// HTTP transport answering from tables and recording every call.
///
/// GETs are answered by URL; SOAP POSTs by action name with an empty body.
/// Unscripted GETs fail, unscripted POSTs answer 200.
#[derive(Default)]
pub struct FakeHttp {
    gets: Mutex<HashMap<String, String>>,
    post_status: Mutex<HashMap<String, u16>>,
    calls: Mutex<Vec<String>>,
    get_gate: Mutex<Option<Arc<Semaphore>>>,
}

impl FakeHttp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn serve(&self, url: &str, body: &str) {
        self.gets.lock().insert(url.to_string(), body.to_string());
    }

    pub fn answer(&self, action: &str, status: u16) {
        self.post_status.lock().insert(action.to_string(), status);
    }

    /// Makes every GET wait for a permit on the returned semaphore.
    pub fn gate_gets(&self) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        *self.get_gate.lock() = Some(Arc::clone(&gate));
        gate
    }

    /// Calls so far, as `"GET <url>"` or `"POST <url> <action>"`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn posted_actions(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| c.strip_prefix("POST ").map(str::to_string))
            .filter_map(|c| c.rsplit(' ').next().map(str::to_string))
            .collect()
    }
}

#[async_trait]
impl HttpTransport for FakeHttp {
    async fn get(&self, url: &str) -> Result<HttpReply, HttpError> {
        self.calls.lock().push(format!("GET {url}"));
        let gate = self.get_gate.lock().clone();
        if let Some(gate) = gate {
            gate.acquire()
                .await
                .map_err(|e| HttpError::Transport(e.to_string()))?
                .forget();
        }
        match self.gets.lock().get(url) {
            Some(body) => Ok(HttpReply {
                status: 200,
                body: body.clone(),
            }),
            None => Err(HttpError::Transport(format!("no route to {url}"))),
        }
    }

    async fn post_soap(
        &self,
        url: &str,
        soap_action: &str,
        _body: String,
    ) -> Result<HttpReply, HttpError> {
        let action = soap_action
            .trim_matches('"')
            .rsplit('#')
            .next()
            .unwrap_or_default()
            .to_string();
        self.calls.lock().push(format!("POST {url} {action}"));
        let status = self.post_status.lock().get(&action).copied().unwrap_or(200);
        Ok(HttpReply {
            status,
            body: String::new(),
        })
    }
}
