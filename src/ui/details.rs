//! Details pane: the raw log of every selected source.

use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};

use super::theme::Theme;
use crate::netlog::{LogEventPhase, LogRecord};
use crate::source_entry::SourceEntry;

fn phase_marker(phase: LogEventPhase) -> &'static str {
    match phase {
        LogEventPhase::Begin => "+",
        LogEventPhase::End => "-",
        LogEventPhase::Unspecified => " ",
    }
}

fn record_line(record: &LogRecord, theme: &Theme) -> Line<'static> {
    let mut spans = vec![
        Span::styled(
            format!("t={:<8} ", record.time.as_deref().unwrap_or("?")),
            Style::default().fg(theme.dimmed),
        ),
        Span::raw(phase_marker(record.phase)),
        Span::styled(
            record.event_type.name(),
            Style::default().fg(theme.foreground),
        ),
    ];
    if let Some(params) = &record.extra_parameters {
        spans.push(Span::styled(
            format!(" {}", params),
            Style::default().fg(theme.dimmed),
        ));
    }
    Line::from(spans)
}

/// One header per source followed by its records, sources separated by a
/// blank line.
pub fn details_lines(entries: &[&SourceEntry], theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for (i, entry) in entries.iter().enumerate() {
        if i > 0 {
            lines.push(Line::default());
        }
        let color = entry
            .row()
            .map_or(theme.dimmed, |row| theme.tag_color(row.style_tag()));
        lines.push(Line::from(vec![
            Span::styled(
                format!("#{} ", entry.source_id()),
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(entry.source_type_label(), Style::default().fg(color)),
        ]));
        lines.extend(entry.records().iter().map(|r| record_line(r, theme)));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::netlog::{LogEventType, LogSourceType, SourceId};
    use crate::source_entry::SourceView;
    use serde_json::json;

    #[derive(Default)]
    struct NullView;

    impl SourceView for NullView {
        fn increment_postfilter_count(&mut self, _: i32) {}
        fn modify_selection_array(&mut self, _: SourceId, _: bool) {}
        fn on_selection_changed(&mut self) {}
        fn current_filter_text(&self) -> &str {
            ""
        }
    }

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_lines_per_source() {
        let mut view = NullView;
        let mut entry = SourceEntry::new(4);
        entry.append(
            LogRecord::new(LogEventType::RequestAlive, 4, LogSourceType::UrlRequest)
                .with_phase(LogEventPhase::Begin),
            &mut view,
        );
        let mut start = LogRecord::new(LogEventType::UrlRequestStart, 4, LogSourceType::UrlRequest)
            .with_params(json!({"url": "http://a"}));
        start.time = Some("100".into());
        entry.append(start, &mut view);

        let other = {
            let mut e = SourceEntry::new(5);
            e.append(
                LogRecord::new(LogEventType::TcpConnect, 5, LogSourceType::Socket)
                    .with_phase(LogEventPhase::End),
                &mut view,
            );
            e
        };

        let theme = Theme::default();
        let lines = details_lines(&[&entry, &other], &theme);
        let texts: Vec<_> = lines.iter().map(text).collect();

        assert_eq!(texts[0], "#4 URL_REQUEST");
        assert_eq!(texts[1], "t=?        +REQUEST_ALIVE");
        assert_eq!(texts[2], r#"t=100       URL_REQUEST_START {"url":"http://a"}"#);
        assert_eq!(texts[3], "");
        assert_eq!(texts[4], "#5 SOCKET");
        assert_eq!(texts[5], "t=?        -TCP_CONNECT");
        assert_eq!(lines.len(), 6);

        // Headers take the row's type accent.
        assert_eq!(lines[0].spans[1].style.fg, Some(theme.url_request));
        assert_eq!(lines[4].spans[1].style.fg, Some(theme.socket));
    }
}
