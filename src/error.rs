/// Failures that abort a catalog load. None of them leaves a partial catalog behind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to fetch {sheet}: {}{message}", .status.map(|s| format!("{s} ")).unwrap_or_default())]
    Fetch { sheet: String, status: Option<u16>, message: String },
    #[error("unparsable response for {sheet}: {message}")]
    Unparsable { sheet: String, message: String },
    #[error("No courses found. Please check your Google Sheet.")]
    EmptyCatalog,
}

impl CatalogError {
    pub fn fetch(sheet: &str, status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Fetch { sheet: sheet.to_string(), status, message: message.into() }
    }

    pub fn unparsable(sheet: &str, message: impl Into<String>) -> Self {
        Self::Unparsable { sheet: sheet.to_string(), message: message.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_message_includes_status_when_known() {
        let e = CatalogError::fetch("Courses", Some(403), "forbidden");
        assert_eq!(e.to_string(), "failed to fetch Courses: 403 forbidden");
        let e = CatalogError::fetch("Lessons", None, "connection refused");
        assert_eq!(e.to_string(), "failed to fetch Lessons: connection refused");
    }
}
