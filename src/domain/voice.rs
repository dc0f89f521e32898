// src/domain/voice.rs
//
// Best-effort extraction of contact fields from one dictated utterance, e.g.
// "ФИО — Щемелев Алексей. Телефон — 9155151. Адрес — улица Ленина, 10".
// Parsing never fails: whatever cannot be located is simply absent.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    FullName,
    Phone,
    Address,
}

/// Cue phrases, lowercase. A space matches any run of whitespace.
const MARKERS: &[(&str, Field)] = &[
    ("фио", Field::FullName),
    ("ф.и.о.", Field::FullName),
    ("полное имя", Field::FullName),
    ("фамилия", Field::FullName),
    ("имя", Field::FullName),
    ("клиент", Field::FullName),
    ("full name", Field::FullName),
    ("name", Field::FullName),
    ("номер телефона", Field::Phone),
    ("телефон", Field::Phone),
    ("тел.", Field::Phone),
    ("номер", Field::Phone),
    ("phone number", Field::Phone),
    ("phone", Field::Phone),
    ("адрес", Field::Address),
    ("address", Field::Address),
];

const PLUS_WORDS: [&str; 2] = ["плюс", "plus"];

/// Fields located in a transcript. `None` means "not mentioned"; `Some("")` means the
/// cue was dictated with nothing after it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VoiceFields {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// The three form values the parser can pre-fill.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContactFields {
    pub full_name: String,
    pub phone: String,
    pub address: String,
}

impl VoiceFields {
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none() && self.phone.is_none() && self.address.is_none()
    }

    /// Form pre-fill: a dictated non-empty value replaces the previous one, anything
    /// else keeps what the user already typed.
    pub fn merged_over(&self, previous: &ContactFields) -> ContactFields {
        fn pick(dictated: &Option<String>, previous: &str) -> String {
            match dictated {
                Some(v) if !v.is_empty() => v.clone(),
                _ => previous.to_string(),
            }
        }

        ContactFields {
            full_name: pick(&self.full_name, &previous.full_name),
            phone: pick(&self.phone, &previous.phone),
            address: pick(&self.address, &previous.address),
        }
    }

    fn offer(&mut self, field: Field, value: Option<String>) {
        let slot = match field {
            Field::FullName => &mut self.full_name,
            Field::Phone => &mut self.phone,
            Field::Address => &mut self.address,
        };
        let Some(value) = value else {
            return;
        };
        // First non-empty occurrence wins.
        match slot {
            None => *slot = Some(value),
            Some(existing) if existing.is_empty() && !value.is_empty() => *slot = Some(value),
            Some(_) => {}
        }
    }
}

#[derive(Debug)]
struct Hit {
    field: Field,
    start: usize,
    end: usize,
}

/// Parse one final transcript. Marker order in the text does not matter; each value
/// runs from its marker to the nearest following marker (or the end).
pub fn parse_transcript(transcript: &str) -> VoiceFields {
    let original: Vec<char> = transcript.chars().collect();
    let folded: Vec<char> = original.iter().copied().map(fold).collect();
    let hits = find_markers(&folded);

    let mut fields = VoiceFields::default();
    for (i, hit) in hits.iter().enumerate() {
        let stop = hits.get(i + 1).map_or(original.len(), |next| next.start);
        let raw: String = original[hit.end..stop].iter().collect();
        let value = clean_value(&raw);
        let value = match hit.field {
            Field::Phone => clean_phone(&value),
            Field::FullName | Field::Address => Some(value),
        };
        fields.offer(hit.field, value);
    }

    if fields.is_empty() {
        tracing::debug!(chars = original.len(), "no contact cues in transcript");
    } else {
        tracing::debug!(markers = hits.len(), ?fields, "parsed transcript");
    }
    fields
}

fn fold(c: char) -> char {
    let lower = c.to_lowercase().next().unwrap_or(c);
    if lower == 'ё' {
        'е'
    } else {
        lower
    }
}

fn find_markers(text: &[char]) -> Vec<Hit> {
    let mut hits = Vec::new();
    let mut pos = 0;

    while pos < text.len() {
        let at_word_start = pos == 0 || !text[pos - 1].is_alphanumeric();
        if at_word_start {
            let longest = MARKERS
                .iter()
                .filter_map(|(marker, field)| match_at(text, pos, marker).map(|end| (end, *field)))
                .max_by_key(|(end, _)| *end);

            if let Some((end, field)) = longest {
                hits.push(Hit {
                    field,
                    start: pos,
                    end,
                });
                pos = end;
                continue;
            }
        }
        pos += 1;
    }

    hits
}

/// End index of `marker` matched at `pos`, if it matches on a word boundary.
fn match_at(text: &[char], pos: usize, marker: &str) -> Option<usize> {
    let mut i = pos;
    for mc in marker.chars() {
        if mc == ' ' {
            let ws_start = i;
            while text.get(i).is_some_and(|c| c.is_whitespace()) {
                i += 1;
            }
            if i == ws_start {
                return None;
            }
        } else {
            if text.get(i) != Some(&mc) {
                return None;
            }
            i += 1;
        }
    }

    let ends_in_word = marker.chars().last().is_some_and(char::is_alphanumeric);
    if ends_in_word && text.get(i).is_some_and(|c| c.is_alphanumeric()) {
        return None;
    }
    Some(i)
}

fn is_trim_char(c: char) -> bool {
    c.is_whitespace() || matches!(c, '-' | '—' | '–' | ':' | ';' | ',' | '.' | '!' | '?' | '"' | '«' | '»')
}

fn clean_value(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.trim_matches(is_trim_char).to_string()
}

/// Keep only dialable characters. A phone cue followed by no digits at all is treated
/// as not located.
fn clean_phone(value: &str) -> Option<String> {
    if value.is_empty() {
        return Some(String::new());
    }

    let spoken: Vec<&str> = value
        .split_whitespace()
        .map(|word| {
            if PLUS_WORDS.contains(&word.to_lowercase().as_str()) {
                "+"
            } else {
                word
            }
        })
        .collect();

    let kept: String = spoken
        .join(" ")
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '+' | '(' | ')' | '-' | ' '))
        .collect();
    let phone = kept
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim_matches(|c: char| c == '-' || c.is_whitespace())
        .to_string();

    if phone.chars().any(|c| c.is_ascii_digit()) {
        Some(phone)
    } else {
        None
    }
}
