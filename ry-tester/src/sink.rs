//! Report sinks
//!
//! The engine and the report formatter only ever talk to a [`ReportSink`]:
//! set a foreground color, reset it, write a line. [`ConsoleSink`] paints
//! lines on stdout with `colored`, [`MemorySink`] records everything for
//! headless use, [`NullSink`] drops it.

use colored::Colorize;

/// Foreground colors used by the report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Red,
    Green,
    Yellow,
    Blue,
    Default,
}

/// Output capability consumed by the engine and the report formatter
pub trait ReportSink {
    /// Switch the foreground color for the following lines
    fn set_color(&mut self, color: Color);

    /// Return to the terminal's default color
    fn reset(&mut self);

    /// Write one line; the sink appends the line break
    fn write_line(&mut self, line: &str);

    /// Write an empty line
    fn blank_line(&mut self) {
        self.write_line("");
    }
}

impl<S: ReportSink + ?Sized> ReportSink for &mut S {
    fn set_color(&mut self, color: Color) {
        (**self).set_color(color);
    }

    fn reset(&mut self) {
        (**self).reset();
    }

    fn write_line(&mut self, line: &str) {
        (**self).write_line(line);
    }

    fn blank_line(&mut self) {
        (**self).blank_line();
    }
}

/// Colored stdout sink
#[derive(Debug, Default)]
pub struct ConsoleSink {
    current: Option<Color>,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReportSink for ConsoleSink {
    fn set_color(&mut self, color: Color) {
        self.current = match color {
            Color::Default => None,
            other => Some(other),
        };
    }

    fn reset(&mut self) {
        self.current = None;
    }

    fn write_line(&mut self, line: &str) {
        match self.current {
            Some(Color::Red) => println!("{}", line.red()),
            Some(Color::Green) => println!("{}", line.green()),
            Some(Color::Yellow) => println!("{}", line.yellow()),
            Some(Color::Blue) => println!("{}", line.blue()),
            Some(Color::Default) | None => println!("{}", line),
        }
    }
}

/// Everything a [`MemorySink`] observed, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEvent {
    Color(Color),
    Reset,
    Line(String),
}

/// Sink that keeps every event in memory
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    events: Vec<SinkEvent>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[SinkEvent] {
        &self.events
    }

    pub fn lines(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|event| match event {
                SinkEvent::Line(line) => Some(line.as_str()),
                _ => None,
            })
            .collect()
    }

    /// All written lines joined with `\n`
    pub fn text(&self) -> String {
        self.lines().join("\n")
    }

    /// Replay the events and pair each line with the color active when it
    /// was written (`None` means default color)
    pub fn colored_lines(&self) -> Vec<(Option<Color>, &str)> {
        let mut current = None;
        let mut lines = Vec::new();
        for event in &self.events {
            match event {
                SinkEvent::Color(Color::Default) | SinkEvent::Reset => current = None,
                SinkEvent::Color(color) => current = Some(*color),
                SinkEvent::Line(line) => lines.push((current, line.as_str())),
            }
        }
        lines
    }

    /// Whether the last color change was followed by a reset
    pub fn ends_reset(&self) -> bool {
        self.events
            .iter()
            .rev()
            .find(|event| !matches!(event, SinkEvent::Line(_)))
            .map_or(true, |event| matches!(event, SinkEvent::Reset | SinkEvent::Color(Color::Default)))
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl ReportSink for MemorySink {
    fn set_color(&mut self, color: Color) {
        self.events.push(SinkEvent::Color(color));
    }

    fn reset(&mut self) {
        self.events.push(SinkEvent::Reset);
    }

    fn write_line(&mut self, line: &str) {
        self.events.push(SinkEvent::Line(line.to_string()));
    }
}

/// Sink that discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl ReportSink for NullSink {
    fn set_color(&mut self, _color: Color) {}

    fn reset(&mut self) {}

    fn write_line(&mut self, _line: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_tracks_colors() {
        let mut sink = MemorySink::new();
        sink.write_line("plain");
        sink.set_color(Color::Green);
        sink.write_line("ok");
        sink.reset();
        sink.write_line("after");

        assert_eq!(
            sink.colored_lines(),
            vec![(None, "plain"), (Some(Color::Green), "ok"), (None, "after")]
        );
        assert!(sink.ends_reset());
        assert_eq!(sink.text(), "plain\nok\nafter");
    }

    #[test]
    fn test_memory_sink_detects_dangling_color() {
        let mut sink = MemorySink::new();
        sink.set_color(Color::Red);
        sink.write_line("failed");
        assert!(!sink.ends_reset());
    }

    #[test]
    fn test_blank_line_writes_empty_line() {
        let mut sink = MemorySink::new();
        sink.blank_line();
        assert_eq!(sink.events(), &[SinkEvent::Line(String::new())]);
    }
}
