//! Threshold classification for water quality parameters.
//!
//! Pure functions mapping a parameter value to a qualitative status. Rules are
//! checked danger first, then warning; anything else is normal. All
//! comparisons are strict, so a value sitting exactly on a boundary falls to
//! the milder class.

/// A measured water quality quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parameter {
    Ph,
    Turbidity,
    Conductivity,
    Temperature,
}

impl Parameter {
    pub const ALL: [Parameter; 4] = [
        Parameter::Ph,
        Parameter::Turbidity,
        Parameter::Conductivity,
        Parameter::Temperature,
    ];

    /// Key used by the backend payloads.
    pub fn raw_key(&self) -> &'static str {
        match self {
            Parameter::Ph => "ph",
            Parameter::Turbidity => "turbidez",
            Parameter::Conductivity => "condutividade",
            Parameter::Temperature => "temperatura",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Parameter::Ph => "pH",
            Parameter::Turbidity => "Turbidez",
            Parameter::Conductivity => "Condutividade",
            Parameter::Temperature => "Temperatura",
        }
    }

    /// Accepts backend keys as well as English names, case-insensitively.
    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim().to_lowercase().as_str() {
            "ph" => Some(Parameter::Ph),
            "turbidez" | "turbidity" => Some(Parameter::Turbidity),
            "condutividade" | "conductivity" => Some(Parameter::Conductivity),
            "temperatura" | "temperature" => Some(Parameter::Temperature),
            _ => None,
        }
    }

    fn thresholds(&self) -> Thresholds {
        match self {
            Parameter::Ph => Thresholds {
                danger_below: Some(6.5),
                danger_above: Some(8.5),
                warning_below: Some(7.0),
                warning_above: Some(8.0),
            },
            Parameter::Turbidity => Thresholds {
                danger_below: None,
                danger_above: Some(10.0),
                warning_below: None,
                warning_above: Some(5.0),
            },
            Parameter::Conductivity => Thresholds {
                danger_below: None,
                danger_above: Some(2.5),
                warning_below: None,
                warning_above: Some(2.0),
            },
            Parameter::Temperature => Thresholds {
                danger_below: Some(15.0),
                danger_above: Some(30.0),
                warning_below: Some(18.0),
                warning_above: Some(25.0),
            },
        }
    }
}

/// Qualitative classification of a parameter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Normal,
    Warning,
    Danger,
    /// No value available.
    Unknown,
}

impl Status {
    pub fn label(&self) -> &'static str {
        match self {
            Status::Normal => "Normal",
            Status::Warning => "Atenção",
            Status::Danger => "Perigo",
            Status::Unknown => "Sem dados",
        }
    }

    /// Ordering used when summarising several statuses; `Unknown` ranks lowest.
    pub fn severity(&self) -> u8 {
        match self {
            Status::Unknown => 0,
            Status::Normal => 1,
            Status::Warning => 2,
            Status::Danger => 3,
        }
    }
}

struct Thresholds {
    danger_below: Option<f64>,
    danger_above: Option<f64>,
    warning_below: Option<f64>,
    warning_above: Option<f64>,
}

impl Thresholds {
    fn outside(below: Option<f64>, above: Option<f64>, value: f64) -> bool {
        below.is_some_and(|b| value < b) || above.is_some_and(|a| value > a)
    }

    fn classify(&self, value: f64) -> Status {
        if Self::outside(self.danger_below, self.danger_above, value) {
            Status::Danger
        } else if Self::outside(self.warning_below, self.warning_above, value) {
            Status::Warning
        } else {
            Status::Normal
        }
    }
}

/// Classify a parameter value. Absent and non-finite values are `Unknown`.
pub fn classify(parameter: Parameter, value: Option<f64>) -> Status {
    match value {
        Some(v) if v.is_finite() => parameter.thresholds().classify(v),
        _ => Status::Unknown,
    }
}
