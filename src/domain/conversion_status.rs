use std::fmt;
use std::str::FromStr;

/// Lifecycle state of a conversion record.
///
/// Progression is forward-only with a single exception: a record that
/// completed its audio leg may re-enter `ConvertingText` when a transcript
/// is requested later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConversionStatus {
    Pending,
    ConvertingMp3,
    ConvertingText,
    Completed,
    Failed,
}

impl ConversionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConversionStatus::Pending => "pending",
            ConversionStatus::ConvertingMp3 => "converting_mp3",
            ConversionStatus::ConvertingText => "converting_text",
            ConversionStatus::Completed => "completed",
            ConversionStatus::Failed => "failed",
        }
    }

    /// Whether `next` is a legal successor of `self` in the pipeline
    /// state machine.
    pub fn can_transition_to(&self, next: ConversionStatus) -> bool {
        use ConversionStatus::*;
        matches!(
            (self, next),
            (Pending, ConvertingMp3)
                | (ConvertingMp3, Completed)
                | (ConvertingMp3, Failed)
                | (Completed, ConvertingText)
                | (ConvertingText, Completed)
                | (ConvertingText, Failed)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ConversionStatus::Completed | ConversionStatus::Failed)
    }
}

impl FromStr for ConversionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ConversionStatus::Pending),
            "converting_mp3" => Ok(ConversionStatus::ConvertingMp3),
            "converting_text" => Ok(ConversionStatus::ConvertingText),
            "completed" => Ok(ConversionStatus::Completed),
            "failed" => Ok(ConversionStatus::Failed),
            _ => Err(format!("Invalid conversion status: {}", s)),
        }
    }
}

impl fmt::Display for ConversionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
