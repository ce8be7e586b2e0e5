//! Console command surface.
//!
//! Console names match the host's console variables so existing project
//! settings keep working.

use std::fmt;

/// Starts or stops a stream capture: `gpa.StreamCapture start|stop`.
pub const STREAM_CAPTURE_COMMAND: &str = "gpa.StreamCapture";

/// Capture library install directory.
pub const BINARY_LOCATION_VARIABLE: &str = "gpa.BinaryLocation";

/// `0` or `1`: launch the companion monitor after a capture stops.
pub const RUN_MONITOR_VARIABLE: &str = "gpa.RunGPAAfterCapture";

/// Argument of [`STREAM_CAPTURE_COMMAND`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamCaptureCommand {
    Start,
    Stop,
}

impl StreamCaptureCommand {
    /// Parse the argument list. Anything other than exactly one `start` or
    /// `stop` token (ASCII case-insensitive) yields `None`.
    pub fn parse(args: &[&str]) -> Option<Self> {
        match args {
            [token] if token.eq_ignore_ascii_case("start") => Some(Self::Start),
            [token] if token.eq_ignore_ascii_case("stop") => Some(Self::Stop),
            _ => None,
        }
    }
}

impl fmt::Display for StreamCaptureCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => f.write_str("start"),
            Self::Stop => f.write_str("stop"),
        }
    }
}

/// One line typed into the host console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand<'a> {
    /// Arguments are passed through unvalidated.
    StreamCapture(Vec<&'a str>),
    /// Query (`None`) or set the install directory.
    BinaryLocation(Option<&'a str>),
    /// Query (`None`) or set the auto-launch flag.
    RunMonitorAfterCapture(Option<bool>),
    /// Same as the toolbar button.
    Toggle,
    Quit,
    Unknown(&'a str),
}

impl<'a> ConsoleCommand<'a> {
    /// Parse a console line. Blank lines yield `None`.
    pub fn parse(line: &'a str) -> Option<Self> {
        let mut parts = line.split_whitespace();
        let name = parts.next()?;
        let args: Vec<&str> = parts.collect();

        let command = if name.eq_ignore_ascii_case(STREAM_CAPTURE_COMMAND) {
            Self::StreamCapture(args)
        } else if name.eq_ignore_ascii_case(BINARY_LOCATION_VARIABLE) {
            // Paths may contain spaces.
            let rest = line.trim_start()[name.len()..].trim();
            Self::BinaryLocation((!rest.is_empty()).then_some(rest))
        } else if name.eq_ignore_ascii_case(RUN_MONITOR_VARIABLE) {
            match args.first() {
                None => Self::RunMonitorAfterCapture(None),
                Some(value) => match parse_flag(value) {
                    Some(flag) => Self::RunMonitorAfterCapture(Some(flag)),
                    None => Self::Unknown(line.trim()),
                },
            }
        } else if name.eq_ignore_ascii_case("toggle") {
            Self::Toggle
        } else if name.eq_ignore_ascii_case("quit") || name.eq_ignore_ascii_case("exit") {
            Self::Quit
        } else {
            Self::Unknown(name)
        };
        Some(command)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    if let Ok(number) = value.parse::<i64>() {
        return Some(number != 0);
    }
    match value.to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" => Some(true),
        "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exactly_one_known_token_is_accepted() {
        assert_eq!(
            StreamCaptureCommand::parse(&["start"]),
            Some(StreamCaptureCommand::Start)
        );
        assert_eq!(
            StreamCaptureCommand::parse(&["STOP"]),
            Some(StreamCaptureCommand::Stop)
        );
        assert_eq!(StreamCaptureCommand::parse(&[]), None);
        assert_eq!(StreamCaptureCommand::parse(&["start", "now"]), None);
        assert_eq!(StreamCaptureCommand::parse(&["pause"]), None);
    }

    #[test]
    fn console_lines_map_to_commands() {
        assert_eq!(
            ConsoleCommand::parse("gpa.StreamCapture start"),
            Some(ConsoleCommand::StreamCapture(vec!["start"]))
        );
        assert_eq!(
            ConsoleCommand::parse("  gpa.RunGPAAfterCapture 1"),
            Some(ConsoleCommand::RunMonitorAfterCapture(Some(true)))
        );
        assert_eq!(
            ConsoleCommand::parse("gpa.RunGPAAfterCapture"),
            Some(ConsoleCommand::RunMonitorAfterCapture(None))
        );
        assert_eq!(ConsoleCommand::parse("toggle"), Some(ConsoleCommand::Toggle));
        assert_eq!(ConsoleCommand::parse("   "), None);
        assert_eq!(
            ConsoleCommand::parse("stat fps"),
            Some(ConsoleCommand::Unknown("stat"))
        );
    }

    #[test]
    fn binary_location_keeps_spaces() {
        assert_eq!(
            ConsoleCommand::parse(r"gpa.BinaryLocation C:\Program Files\GPA\bin\Release"),
            Some(ConsoleCommand::BinaryLocation(Some(
                r"C:\Program Files\GPA\bin\Release"
            )))
        );
        assert_eq!(
            ConsoleCommand::parse("gpa.BinaryLocation"),
            Some(ConsoleCommand::BinaryLocation(None))
        );
    }

    #[test]
    fn bad_flag_value_is_unknown() {
        assert_eq!(
            ConsoleCommand::parse("gpa.RunGPAAfterCapture maybe"),
            Some(ConsoleCommand::Unknown("gpa.RunGPAAfterCapture maybe"))
        );
    }
}
