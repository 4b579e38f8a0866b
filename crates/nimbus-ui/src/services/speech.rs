//! Speech-to-text collaborator for voice search.

use async_trait::async_trait;
use nimbus_core::VoiceError;

#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Capture one utterance and return its transcript.
    async fn listen(&self) -> Result<String, VoiceError>;
}

/// For systems without any speech input.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedSpeech;

#[async_trait]
impl SpeechRecognizer for UnsupportedSpeech {
    async fn listen(&self) -> Result<String, VoiceError> {
        Err(VoiceError::Unsupported)
    }
}

/// Dictation through the terminal: the next line typed on stdin is the transcript.
///
/// End of input means there is nothing to listen to (`NoMicrophone`); a blank
/// line is `NoSpeech`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdinDictation;

#[async_trait]
impl SpeechRecognizer for StdinDictation {
    async fn listen(&self) -> Result<String, VoiceError> {
        let line = tokio::task::spawn_blocking(|| {
            let mut buf = String::new();
            std::io::stdin().read_line(&mut buf).map(|n| (n, buf))
        })
        .await
        .map_err(|e| VoiceError::Other(e.to_string()))?;

        transcript_from_read(line)
    }
}

/// Classify one `read_line` result as a transcript or a voice failure.
fn transcript_from_read(read: std::io::Result<(usize, String)>) -> Result<String, VoiceError> {
    match read {
        Ok((0, _)) => Err(VoiceError::NoMicrophone),
        Ok((_, text)) if text.trim().is_empty() => Err(VoiceError::NoSpeech),
        Ok((_, text)) => Ok(text.trim().to_string()),
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            Err(VoiceError::PermissionDenied)
        }
        Err(e) => Err(VoiceError::Other(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unsupported_always_fails() {
        assert_eq!(UnsupportedSpeech.listen().await, Err(VoiceError::Unsupported));
    }

    #[test]
    fn end_of_input_means_no_microphone() {
        assert_eq!(
            transcript_from_read(Ok((0, String::new()))),
            Err(VoiceError::NoMicrophone)
        );
    }

    #[test]
    fn blank_line_means_no_speech() {
        assert_eq!(
            transcript_from_read(Ok((3, "  \n".into()))),
            Err(VoiceError::NoSpeech)
        );
    }

    #[test]
    fn typed_line_is_trimmed_transcript() {
        assert_eq!(
            transcript_from_read(Ok((8, " Oslo \n".into()))),
            Ok("Oslo".to_string())
        );
    }

    #[test]
    fn read_errors_are_classified() {
        use std::io::{Error, ErrorKind};

        assert_eq!(
            transcript_from_read(Err(Error::new(ErrorKind::PermissionDenied, "denied"))),
            Err(VoiceError::PermissionDenied)
        );
        assert!(matches!(
            transcript_from_read(Err(Error::new(ErrorKind::BrokenPipe, "gone"))),
            Err(VoiceError::Other(_))
        ));
    }
}
