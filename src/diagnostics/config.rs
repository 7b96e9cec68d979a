use std::str::FromStr;

/// Selects which source lines a stage prints trace output for.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TracingConfig {
    All,
    Between(usize, usize),
    Before(usize),
    After(usize),
    Only(usize),
    Off,
}

impl TracingConfig {
    /// Returns true if tracing is enabled for the given line.
    pub fn includes(&self, line: usize) -> bool {
        match *self {
            TracingConfig::All => true,
            TracingConfig::Between(start, end) => start <= line && line <= end,
            TracingConfig::Before(end) => line <= end,
            TracingConfig::After(start) => start <= line,
            TracingConfig::Only(ln) => ln == line,
            TracingConfig::Off => false,
        }
    }
}

/// Parses `all`, `N`, `N:`, `:N` or `N:M`.
impl FromStr for TracingConfig {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse = |n: &str| {
            n.parse::<usize>()
                .map_err(|_| format!("Invalid line number in trace range: {}", n))
        };

        match s {
            "all" => Ok(TracingConfig::All),
            "off" => Ok(TracingConfig::Off),
            _ => match s.find(':') {
                None => Ok(TracingConfig::Only(parse(s)?)),
                Some(idx) => {
                    let (start, end) = (&s[..idx], &s[idx + 1..]);
                    match (start.is_empty(), end.is_empty()) {
                        (true, true) => Ok(TracingConfig::All),
                        (false, true) => Ok(TracingConfig::After(parse(start)?)),
                        (true, false) => Ok(TracingConfig::Before(parse(end)?)),
                        (false, false) => {
                            Ok(TracingConfig::Between(parse(start)?, parse(end)?))
                        }
                    }
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_trace_ranges() {
        for (text, expected) in vec![
            ("all", TracingConfig::All),
            ("off", TracingConfig::Off),
            ("5", TracingConfig::Only(5)),
            ("5:", TracingConfig::After(5)),
            (":5", TracingConfig::Before(5)),
            ("2:7", TracingConfig::Between(2, 7)),
        ] {
            assert_eq!(text.parse::<TracingConfig>(), Ok(expected));
        }

        assert!("x:3".parse::<TracingConfig>().is_err());
    }

    #[test]
    fn trace_range_includes() {
        assert!(TracingConfig::Between(2, 4).includes(3));
        assert!(!TracingConfig::Between(2, 4).includes(5));
        assert!(TracingConfig::Before(4).includes(4));
        assert!(!TracingConfig::After(4).includes(3));
        assert!(!TracingConfig::Off.includes(1));
    }
}
