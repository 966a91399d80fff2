/*
 * Responsibility
 * - 認証ゲートの監査ログ出力先 (AuditSink)
 * - Gate には構築時に注入する (global logger を直接触らない)
 * - fire-and-forget: 出力失敗を gate に返さない
 */
use axum::http::{Method, Uri};

/// Receives one entry per rejected request.
pub trait AuditSink: Send + Sync {
    /// A request was refused for a client-side reason (no token, bad token).
    fn warn(&self, method: &Method, uri: &Uri, reason: &'static str);

    /// The gate could not decide because the validator failed.
    fn error(
        &self,
        method: &Method,
        uri: &Uri,
        error: &(dyn std::error::Error + 'static),
        message: &'static str,
    );
}

/// Writes audit entries as `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn warn(&self, method: &Method, uri: &Uri, reason: &'static str) {
        tracing::warn!(method = %method, uri = %uri, "{reason}");
    }

    fn error(
        &self,
        method: &Method,
        uri: &Uri,
        error: &(dyn std::error::Error + 'static),
        message: &'static str,
    ) {
        tracing::error!(method = %method, uri = %uri, error = %error, "{message}");
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use super::*;

    /// In-memory writer for the fmt subscriber.
    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn capture(f: impl FnOnce()) -> String {
        let out = Captured::default();
        let writer = out.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::TRACE)
            .finish();

        tracing::subscriber::with_default(subscriber, f);

        let bytes = out.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn warn_is_a_warn_event_with_request_fields() {
        let output = capture(|| {
            TracingAuditSink.warn(
                &Method::GET,
                &Uri::from_static("/api/v1/me?x=1"),
                "Unauthenticated request.",
            )
        });

        assert_eq!(output.lines().count(), 1, "{output}");
        assert!(output.contains("WARN"), "{output}");
        assert!(!output.contains("ERROR"), "{output}");
        assert!(output.contains("Unauthenticated request."), "{output}");
        assert!(output.contains("method=GET"), "{output}");
        assert!(output.contains("uri=/api/v1/me?x=1"), "{output}");
    }

    #[test]
    fn error_is_an_error_event_carrying_the_cause() {
        let cause = io::Error::other("key store offline");

        let output = capture(|| {
            TracingAuditSink.error(
                &Method::POST,
                &Uri::from_static("/api/v1/me"),
                &cause,
                "Error parsing JWT string.",
            )
        });

        assert_eq!(output.lines().count(), 1, "{output}");
        assert!(output.contains("ERROR"), "{output}");
        assert!(output.contains("Error parsing JWT string."), "{output}");
        assert!(output.contains("method=POST"), "{output}");
        assert!(output.contains("error=key store offline"), "{output}");
    }
}
