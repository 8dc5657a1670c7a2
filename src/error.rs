use std::error::Error;
use std::fmt;
use std::io;

pub type Result<T> = std::result::Result<T, InlinerError>;

#[derive(Debug)]
pub enum InlinerError {
    InvalidArgument {
        argument: &'static str,
        reason: &'static str,
    },
    /// Every problem the stylesheet parser ran into, in source order.
    Parse(Vec<String>),
    Io(io::Error),
}

impl InlinerError {
    pub(crate) fn invalid_argument(argument: &'static str, reason: &'static str) -> Self {
        InlinerError::InvalidArgument { argument, reason }
    }
}

impl Error for InlinerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            InlinerError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for InlinerError {
    fn from(err: io::Error) -> Self {
        InlinerError::Io(err)
    }
}

impl fmt::Display for InlinerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use InlinerError::*;

        match self {
            InvalidArgument { argument, reason } => {
                write!(f, "Invalid argument \"{}\": {}.", argument, reason)
            }
            Parse(errors) => {
                write!(f, "CSS stylesheet has errors:")?;
                for error in errors {
                    write!(f, " {}", error)?;
                }
                Ok(())
            }
            Io(err) => write!(f, "I/O error: {}", err),
        }
    }
}
