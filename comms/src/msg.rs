use std::{fmt, io, str::FromStr};

/// The fixed reply for a request line that isn't a number.
pub const NOT_A_NUMBER: &str = "input must be a number";

/// The fixed reply for a request that arrives before the model is trained.
pub const NOT_READY: &str = "model is still training, try again in a moment";

/// A prediction request, the feature value the client wants a target for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Request(pub f64);

impl Request {
    fn not_a_number<T>(line: &str) -> io::Result<T> {
        Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("Received a request that isn't a finite number: {line:?}"),
        ))
    }
}

impl FromStr for Request {
    type Err = io::Error;

    /// Parses a decimal or scientific notation number, surrounding whitespace
    /// is ignored. Infinities and NaN are rejected.
    fn from_str(line: &str) -> io::Result<Self> {
        match line.trim().parse::<f64>() {
            Ok(x) if x.is_finite() => Ok(Self(x)),
            _ => Self::not_a_number(line),
        }
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Every possible reply line the server may send.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reply {
    Prediction(f64),
    NotANumber,
    NotReady,
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Prediction(y) => write!(f, "{y:.2}"),
            Reply::NotANumber => f.write_str(NOT_A_NUMBER),
            Reply::NotReady => f.write_str(NOT_READY),
        }
    }
}

impl FromStr for Reply {
    type Err = io::Error;

    fn from_str(line: &str) -> io::Result<Self> {
        match line {
            NOT_A_NUMBER => Ok(Reply::NotANumber),
            NOT_READY => Ok(Reply::NotReady),
            other => other.parse().map(Reply::Prediction).map_err(|e| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("Received an invalid reply {other:?}: {e}"),
                )
            }),
        }
    }
}
