//! Stop / line records → chat replies.

use crate::domain::{LineRecord, StopEntry, StopRecord};

/// Output language of the fixed reply strings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Language {
    #[default]
    Italian,
    English,
}

impl Language {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "it" | "ita" | "italian" | "italiano" => Some(Self::Italian),
            "en" | "eng" | "english" => Some(Self::English),
            _ => None,
        }
    }
}

/// Fixed labels used by [`Renderer`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderStrings {
    pub stop_not_found: String,
    pub line_not_found: String,
    pub stop_label: String,
    pub no_incoming: String,
    pub bus_label: String,
    pub destination_label: String,
    pub scheduled_label: String,
    pub remaining_label: String,
}

impl RenderStrings {
    pub fn italian() -> Self {
        Self {
            stop_not_found: "Fermata non esistente".to_string(),
            line_not_found: "Linea non esistente".to_string(),
            stop_label: "Fermata".to_string(),
            no_incoming: "Nessun autobus in arrivo".to_string(),
            bus_label: "Numero Autobus".to_string(),
            destination_label: "Direzione".to_string(),
            scheduled_label: "Orario di arrivo".to_string(),
            remaining_label: "Tempo rimanente".to_string(),
        }
    }

    pub fn english() -> Self {
        Self {
            stop_not_found: "Stop does not exist".to_string(),
            line_not_found: "Line does not exist".to_string(),
            stop_label: "Stop".to_string(),
            no_incoming: "No incoming buses".to_string(),
            bus_label: "Bus".to_string(),
            destination_label: "Destination".to_string(),
            scheduled_label: "Arrival time".to_string(),
            remaining_label: "Time remaining".to_string(),
        }
    }

    pub fn for_language(lang: Language) -> Self {
        match lang {
            Language::Italian => Self::italian(),
            Language::English => Self::english(),
        }
    }
}

impl Default for RenderStrings {
    fn default() -> Self {
        Self::italian()
    }
}

/// Pure formatter for backend records. Holds no state besides its labels.
#[derive(Clone, Debug, Default)]
pub struct Renderer {
    strings: RenderStrings,
}

impl Renderer {
    pub fn new(strings: RenderStrings) -> Self {
        Self { strings }
    }

    pub fn render_stop(&self, stop: &StopRecord) -> String {
        let s = &self.strings;
        if stop.name.is_empty() {
            return s.stop_not_found.clone();
        }

        let header = format!("{}: {}", s.stop_label, stop.name);
        if stop.entries.is_empty() {
            return format!("{header}\n{}", s.no_incoming);
        }

        let blocks = stop
            .entries
            .iter()
            .map(|e| self.entry_block(e))
            .collect::<Vec<_>>()
            .join("\n\n");
        format!("{header}\n{blocks}")
    }

    fn entry_block(&self, e: &StopEntry) -> String {
        let s = &self.strings;
        format!(
            "{}: {}\n{}: {}\n{}: {}\n{}: {}",
            s.bus_label,
            e.line,
            s.destination_label,
            e.destination,
            s.scheduled_label,
            e.scheduled_time,
            s.remaining_label,
            e.estimated_arrival
        )
    }

    pub fn render_line(&self, line: &LineRecord) -> String {
        if line.directions.is_empty() {
            return self.strings.line_not_found.clone();
        }

        line.directions
            .iter()
            .map(|d| format!("{}\n{}", d.label, d.times.join(", ")))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Length as Telegram counts it (UTF-16 code units).
pub fn utf16_len(s: &str) -> usize {
    s.encode_utf16().count()
}

/// Split `text` into chunks of at most `max_len` UTF-16 code units.
///
/// Breaks at the last blank line that fits, else the last newline, else
/// mid-line. Separators at a break are dropped; nothing else is. A single
/// char wider than `max_len` still goes out alone.
pub fn split_message(text: &str, max_len: usize) -> Vec<String> {
    let max_len = max_len.max(1);
    let mut out = Vec::new();
    let mut rest = text;

    while utf16_len(rest) > max_len {
        // Byte offset of the first char that no longer fits.
        let mut units = 0;
        let mut limit = rest.len();
        for (i, ch) in rest.char_indices() {
            units += ch.len_utf16();
            if units > max_len {
                limit = i;
                break;
            }
        }
        if limit == 0 {
            limit = rest.chars().next().map_or(rest.len(), char::len_utf8);
        }
        let window = &rest[..limit];

        let (cut, skip) = if let Some(i) = window.rfind("\n\n").filter(|&i| i > 0) {
            (i, 2)
        } else if let Some(i) = window.rfind('\n').filter(|&i| i > 0) {
            (i, 1)
        } else {
            (limit, 0)
        };

        out.push(rest[..cut].to_string());
        rest = &rest[cut + skip..];
    }

    if !rest.is_empty() || out.is_empty() {
        out.push(rest.to_string());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LineDirection;

    fn entry(line: &str, dest: &str, time: &str, eta: &str) -> StopEntry {
        StopEntry {
            line: line.into(),
            destination: dest.into(),
            scheduled_time: time.into(),
            estimated_arrival: eta.into(),
        }
    }

    #[test]
    fn unknown_stop() {
        let r = Renderer::default();
        assert_eq!(r.render_stop(&StopRecord::default()), "Fermata non esistente");

        // Entries do not matter once the name is empty.
        let stop = StopRecord {
            name: String::new(),
            entries: vec![entry("61", "Stazione", "10:00", "5 min")],
        };
        assert_eq!(r.render_stop(&stop), "Fermata non esistente");

        let en = Renderer::new(RenderStrings::english());
        assert_eq!(en.render_stop(&StopRecord::default()), "Stop does not exist");
    }

    #[test]
    fn stop_without_arrivals() {
        let stop = StopRecord {
            name: "Duomo".into(),
            entries: vec![],
        };
        assert_eq!(
            Renderer::default().render_stop(&stop),
            "Fermata: Duomo\nNessun autobus in arrivo"
        );
        assert_eq!(
            Renderer::new(RenderStrings::english()).render_stop(&stop),
            "Stop: Duomo\nNo incoming buses"
        );
    }

    #[test]
    fn stop_blocks_in_order_with_single_blank_line() {
        let stop = StopRecord {
            name: "Duomo".into(),
            entries: vec![
                entry("61", "Stazione", "10:00", "5 min"),
                entry("62", "Porta", "10:05", "10 min"),
            ],
        };
        let expected = "Stop: Duomo\n\
Bus: 61\n\
Destination: Stazione\n\
Arrival time: 10:00\n\
Time remaining: 5 min\n\
\n\
Bus: 62\n\
Destination: Porta\n\
Arrival time: 10:05\n\
Time remaining: 10 min";
        assert_eq!(
            Renderer::new(RenderStrings::english()).render_stop(&stop),
            expected
        );

        let it = Renderer::default().render_stop(&stop);
        assert!(it.starts_with("Fermata: Duomo\nNumero Autobus: 61\n"));
        assert!(!it.ends_with('\n'));
        assert_eq!(it.matches("\n\n").count(), 1);
    }

    #[test]
    fn empty_fields_render_as_empty_segments() {
        let stop = StopRecord {
            name: "X".into(),
            entries: vec![StopEntry::default()],
        };
        assert_eq!(
            Renderer::default().render_stop(&stop),
            "Fermata: X\nNumero Autobus: \nDirezione: \nOrario di arrivo: \nTempo rimanente: "
        );
    }

    #[test]
    fn lines() {
        let r = Renderer::new(RenderStrings::english());
        assert_eq!(r.render_line(&LineRecord::default()), "Line does not exist");
        assert_eq!(
            Renderer::default().render_line(&LineRecord::default()),
            "Linea non esistente"
        );

        let line = LineRecord {
            directions: vec![
                LineDirection {
                    label: "Verso Stazione".into(),
                    times: vec!["10:00".into(), "10:20".into(), "10:40".into()],
                },
                LineDirection {
                    label: "Verso Porta".into(),
                    times: vec![],
                },
            ],
        };
        assert_eq!(
            r.render_line(&line),
            "Verso Stazione\n10:00, 10:20, 10:40\n\nVerso Porta\n"
        );
    }

    #[test]
    fn decoded_payloads_always_render() {
        let r = Renderer::default();
        for raw in [
            "{}",
            r#"{"name": ""}"#,
            r#"{"name": "A", "stops": []}"#,
            r#"{"name": "A", "stops": [{}]}"#,
            r#"{"name": "A", "stops": null}"#,
        ] {
            let stop: StopRecord = serde_json::from_str(raw).unwrap();
            assert!(!r.render_stop(&stop).is_empty(), "{raw}");
        }
        for raw in [
            "{}",
            r#"{"lines": []}"#,
            r#"{"lines": [{}]}"#,
            r#"{"lines": [{"direction": "", "times": [""]}]}"#,
        ] {
            let line: LineRecord = serde_json::from_str(raw).unwrap();
            let _ = r.render_line(&line);
        }
    }

    #[test]
    fn language_parse() {
        assert_eq!(Language::parse("EN"), Some(Language::English));
        assert_eq!(Language::parse(" it "), Some(Language::Italian));
        assert_eq!(Language::parse("fr"), None);
    }

    #[test]
    fn split_short_text_is_untouched() {
        assert_eq!(split_message("ciao", 10), vec!["ciao".to_string()]);
        assert_eq!(split_message("", 10), vec![String::new()]);
    }

    #[test]
    fn split_prefers_blank_lines() {
        let text = "aaaa\nbbbb\n\ncccc\ndddd";
        let chunks = split_message(text, 12);
        assert_eq!(chunks, vec!["aaaa\nbbbb", "cccc\ndddd"]);
    }

    #[test]
    fn split_counts_utf16_units() {
        // Each emoji is two UTF-16 units.
        let text = "\u{1F68C}".repeat(5);
        let chunks = split_message(&text, 4);
        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().all(|c| utf16_len(c) <= 4));
        assert_eq!(chunks.concat(), text);

        // Wider than the limit: one char per chunk, never an empty chunk.
        let chunks = split_message("\u{1F68C}\u{1F68C}", 1);
        assert_eq!(chunks, vec!["\u{1F68C}", "\u{1F68C}"]);
    }

    #[test]
    fn split_respects_limit_without_separators() {
        let text = "é".repeat(25);
        let chunks = split_message(&text, 10);
        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().all(|c| c.chars().count() <= 10));
        assert_eq!(chunks.concat(), text);
    }
}
