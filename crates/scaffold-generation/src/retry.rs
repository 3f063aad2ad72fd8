//! Single retry for transient filesystem failures

use std::io;

use tracing::warn;

/// Whether an IO error is worth one more attempt
pub fn is_transient(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted | io::ErrorKind::TimedOut
    )
}

/// Run `op`, retrying once if it fails transiently and `enabled` is set
pub fn retry_once<T>(enabled: bool, what: &str, mut op: impl FnMut() -> io::Result<T>) -> io::Result<T> {
    match op() {
        Err(err) if enabled && is_transient(&err) => {
            warn!("Transient failure during {}: {}; retrying once", what, err);
            op()
        }
        result => result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retries_transient_once() {
        let mut attempts = 0;
        let result = retry_once(true, "test", || {
            attempts += 1;
            if attempts == 1 {
                Err(io::Error::from(io::ErrorKind::WouldBlock))
            } else {
                Ok(attempts)
            }
        });
        assert_eq!(result.unwrap(), 2);
    }

    #[test]
    fn test_second_transient_failure_surfaces() {
        let mut attempts = 0;
        let result: io::Result<()> = retry_once(true, "test", || {
            attempts += 1;
            Err(io::Error::from(io::ErrorKind::Interrupted))
        });
        assert!(result.is_err());
        assert_eq!(attempts, 2);
    }

    #[test]
    fn test_permanent_failure_not_retried() {
        let mut attempts = 0;
        let result: io::Result<()> = retry_once(true, "test", || {
            attempts += 1;
            Err(io::Error::from(io::ErrorKind::PermissionDenied))
        });
        assert!(result.is_err());
        assert_eq!(attempts, 1);
    }

    #[test]
    fn test_disabled_retry() {
        let mut attempts = 0;
        let result: io::Result<()> = retry_once(false, "test", || {
            attempts += 1;
            Err(io::Error::from(io::ErrorKind::WouldBlock))
        });
        assert!(result.is_err());
        assert_eq!(attempts, 1);
    }
}
