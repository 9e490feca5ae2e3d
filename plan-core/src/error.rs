use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error("could not read plan file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not write plan file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to unmarshal plan: {0}")]
    Parse(#[source] serde_yaml::Error),

    #[error("error marshalling plan to yaml: {0}")]
    Marshal(#[source] serde_yaml::Error),

    #[error("failed to generate alphanumeric password after {attempts} attempts")]
    PasswordExhausted { attempts: usize },

    /// The comment scan and the rendered document structure disagree. This is
    /// a bug in the renderer, never a problem with the user's plan.
    #[error("plan annotation lost track of the document structure at line {line}: {reason}")]
    AnnotationDesync { line: usize, reason: String },

    #[error("invalid CIDR block {cidr:?}: {reason}")]
    InvalidCidr { cidr: String, reason: String },

    #[error("{context}: {source}")]
    Context {
        context: &'static str,
        #[source]
        source: Box<PlanError>,
    },
}

impl PlanError {
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }

    pub fn desync(line: usize, reason: impl Into<String>) -> Self {
        Self::AnnotationDesync {
            line,
            reason: reason.into(),
        }
    }

    pub fn invalid_cidr(cidr: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidCidr {
            cidr: cidr.into(),
            reason: reason.into(),
        }
    }

    /// Wraps the error with the name of the operation that failed.
    pub fn context(self, context: &'static str) -> Self {
        Self::Context {
            context,
            source: Box::new(self),
        }
    }

    /// True for internal invariant violations, false for problems with the
    /// plan file or its environment.
    pub fn is_defect(&self) -> bool {
        match self {
            Self::AnnotationDesync { .. } => true,
            Self::Context { source, .. } => source.is_defect(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_exhausted_display() {
        let err = PlanError::PasswordExhausted { attempts: 6 };
        assert_eq!(
            err.to_string(),
            "failed to generate alphanumeric password after 6 attempts"
        );
    }

    #[test]
    fn context_keeps_defect_classification() {
        let err = PlanError::desync(4, "stack underflow").context("error writing plan");
        assert!(err.is_defect());
        assert!(err.to_string().starts_with("error writing plan: "));

        let err = PlanError::PasswordExhausted { attempts: 6 }.context("error writing plan");
        assert!(!err.is_defect());
    }
}
