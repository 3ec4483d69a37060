/// Receives user-facing progress and error lines from an upload run.
///
/// This is the only channel on which sentry-cli output and translated
/// error messages reach the caller; diagnostic detail goes to `tracing`.
pub trait LogSink {
    fn line(&self, message: &str);
}

impl<F: Fn(&str)> LogSink for F {
    fn line(&self, message: &str) {
        self(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn closures_are_log_sinks() {
        let lines = Mutex::new(Vec::new());
        let sink = |message: &str| lines.lock().unwrap().push(message.to_string());
        sink.line("release created");
        assert_eq!(lines.into_inner().unwrap(), vec!["release created"]);
    }
}
