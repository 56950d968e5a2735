//! Engine option declarations (`option name ... type ...`).

/// The type and limits of an option an engine declares during `uci`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionKind {
    /// Boolean option.
    Check { default: Option<bool> },
    /// Integer option with inclusive bounds.
    Spin {
        default: Option<i64>,
        min: Option<i64>,
        max: Option<i64>,
    },
    /// One of a fixed set of strings.
    Combo {
        default: Option<String>,
        vars: Vec<String>,
    },
    /// Action without a value.
    Button,
    /// Free-form string.
    String { default: Option<String> },
}

/// An option declared by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UciOption {
    /// Option name as declared (may contain spaces).
    pub name: String,
    /// Option type and limits.
    pub kind: OptionKind,
}

impl UciOption {
    /// Parse an `option` line.
    ///
    /// Returns `None` for lines that are not option declarations or that
    /// declare an unknown type.
    pub fn parse(line: &str) -> Option<Self> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.first() != Some(&"option") || parts.get(1) != Some(&"name") {
            return None;
        }

        let type_idx = parts.iter().position(|&p| p == "type")?;
        if type_idx <= 2 {
            return None;
        }
        let name = parts[2..type_idx].join(" ");
        let kind_token = *parts.get(type_idx + 1)?;
        let fields = Fields::collect(&parts[type_idx + 2..]);

        let kind = match kind_token {
            "check" => OptionKind::Check {
                default: fields.default.as_deref().and_then(|d| d.parse().ok()),
            },
            "spin" => OptionKind::Spin {
                default: fields.default.as_deref().and_then(|d| d.parse().ok()),
                min: fields.min.as_deref().and_then(|d| d.parse().ok()),
                max: fields.max.as_deref().and_then(|d| d.parse().ok()),
            },
            "combo" => OptionKind::Combo {
                default: fields.default,
                vars: fields.vars,
            },
            "button" => OptionKind::Button,
            "string" => OptionKind::String {
                default: fields.default.filter(|d| d != "<empty>"),
            },
            _ => return None,
        };

        Some(UciOption { name, kind })
    }

    /// Inclusive range of a spin option, if the engine declared both bounds.
    pub fn spin_range(&self) -> Option<(i64, i64)> {
        match self.kind {
            OptionKind::Spin {
                min: Some(min),
                max: Some(max),
                ..
            } => Some((min, max)),
            _ => None,
        }
    }

    /// Returns true if `value` is acceptable for this option.
    pub fn accepts(&self, value: i64) -> bool {
        match &self.kind {
            OptionKind::Spin { min, max, .. } => {
                min.map_or(true, |m| value >= m) && max.map_or(true, |m| value <= m)
            }
            _ => false,
        }
    }
}

/// Key/value fields following `type <kind>`. Values may span several tokens.
#[derive(Default)]
struct Fields {
    default: Option<String>,
    min: Option<String>,
    max: Option<String>,
    vars: Vec<String>,
}

impl Fields {
    fn collect(tokens: &[&str]) -> Self {
        let mut fields = Fields::default();
        let mut key: Option<&str> = None;
        let mut value: Vec<&str> = Vec::new();

        for &tok in tokens.iter().chain(std::iter::once(&"")) {
            let is_key = matches!(tok, "default" | "min" | "max" | "var" | "");
            if !is_key {
                value.push(tok);
                continue;
            }
            if let Some(k) = key.take() {
                let v = value.join(" ");
                match k {
                    "default" => fields.default = Some(v),
                    "min" => fields.min = Some(v),
                    "max" => fields.max = Some(v),
                    _ => fields.vars.push(v),
                }
            }
            value.clear();
            key = Some(tok).filter(|t| !t.is_empty());
        }

        fields
    }
}
