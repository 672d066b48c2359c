//! Device pickers for the `play` command.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use dlna_core::{DevicePicker, Device, PickerChoice};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

/// Prompts on the terminal for a device number.
pub struct TerminalPicker;

#[async_trait]
impl DevicePicker for TerminalPicker {
    async fn pick(&self, devices: &[Device]) -> PickerChoice {
        let mut out = tokio::io::stdout();
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        let mut menu = String::from("\nSelect a renderer:\n");
        if devices.is_empty() {
            menu.push_str("  (no renderers found yet)\n");
        }
        for (i, device) in devices.iter().enumerate() {
            menu.push_str(&format!(
                "  {}) {}\n     {}\n",
                i + 1,
                device,
                device.manufacturer_label()
            ));
        }
        menu.push_str("Number, r to refresh, q to cancel: ");

        loop {
            if out.write_all(menu.as_bytes()).await.is_err() || out.flush().await.is_err() {
                return PickerChoice::Cancel;
            }
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                _ => return PickerChoice::Cancel,
            };
            match parse_answer(&line, devices.len()) {
                Some(Answer::Index(i)) => return PickerChoice::Select(devices[i].clone()),
                Some(Answer::Refresh) => return PickerChoice::Refresh,
                Some(Answer::Cancel) => return PickerChoice::Cancel,
                None => {
                    let _ = out.write_all(b"Invalid choice.\n").await;
                }
            }
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Answer {
    Index(usize),
    Refresh,
    Cancel,
}

fn parse_answer(line: &str, count: usize) -> Option<Answer> {
    match line.trim() {
        "r" | "R" => Some(Answer::Refresh),
        "q" | "Q" => Some(Answer::Cancel),
        other => match other.parse::<usize>() {
            Ok(n) if (1..=count).contains(&n) => Some(Answer::Index(n - 1)),
            _ => None,
        },
    }
}

/// Picks the first device whose name or UDN matches, refreshing a few times
/// before giving up.
pub struct MatchingPicker {
    wanted: String,
    refreshes_left: AtomicUsize,
}

impl MatchingPicker {
    pub fn new(wanted: impl Into<String>, max_refreshes: usize) -> Self {
        Self {
            wanted: wanted.into(),
            refreshes_left: AtomicUsize::new(max_refreshes),
        }
    }

    fn matches(&self, device: &Device) -> bool {
        device.name.eq_ignore_ascii_case(&self.wanted)
            || device.udn.as_deref() == Some(self.wanted.as_str())
    }
}

#[async_trait]
impl DevicePicker for MatchingPicker {
    async fn pick(&self, devices: &[Device]) -> PickerChoice {
        if let Some(device) = devices.iter().find(|d| self.matches(d)) {
            return PickerChoice::Select(device.clone());
        }
        let remaining = self.refreshes_left.load(Ordering::SeqCst);
        if remaining == 0 {
            log::warn!("No renderer matching '{}' found", self.wanted);
            return PickerChoice::Cancel;
        }
        self.refreshes_left.store(remaining - 1, Ordering::SeqCst);
        log::info!("'{}' not found yet, refreshing", self.wanted);
        PickerChoice::Refresh
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device(name: &str, udn: &str) -> Device {
        Device {
            name: name.to_string(),
            manufacturer: None,
            location: "http://10.0.0.2/desc.xml".to_string(),
            control_url: Some("http://10.0.0.2/ctl".to_string()),
            udn: Some(udn.to_string()),
        }
    }

    #[test]
    fn parses_terminal_answers() {
        assert_eq!(parse_answer(" 2 ", 3), Some(Answer::Index(1)));
        assert_eq!(parse_answer("r", 0), Some(Answer::Refresh));
        assert_eq!(parse_answer("Q", 3), Some(Answer::Cancel));
        assert_eq!(parse_answer("0", 3), None);
        assert_eq!(parse_answer("4", 3), None);
        assert_eq!(parse_answer("tv", 3), None);
    }

    #[tokio::test]
    async fn matching_picker_selects_by_name_or_udn() {
        let devices = vec![device("Kitchen", "uuid:k"), device("Living Room", "uuid:l")];

        let by_name = MatchingPicker::new("living room", 0);
        assert_eq!(
            by_name.pick(&devices).await,
            PickerChoice::Select(devices[1].clone())
        );

        let by_udn = MatchingPicker::new("uuid:k", 0);
        assert_eq!(
            by_udn.pick(&devices).await,
            PickerChoice::Select(devices[0].clone())
        );
    }

    #[tokio::test]
    async fn matching_picker_refreshes_then_cancels() {
        let picker = MatchingPicker::new("Bedroom", 1);
        assert_eq!(picker.pick(&[]).await, PickerChoice::Refresh);
        assert_eq!(picker.pick(&[]).await, PickerChoice::Cancel);
    }
}
