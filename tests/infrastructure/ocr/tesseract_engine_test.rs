use std::path::PathBuf;

use papyrus::application::ports::{OcrEngine, OcrEngineError};
use papyrus::domain::Language;
use papyrus::infrastructure::ocr::TesseractEngine;

#[tokio::test]
async fn given_missing_binary_when_recognizing_then_returns_spawn_failed() {
    let engine = TesseractEngine::new(
        PathBuf::from("/nonexistent/bin/tesseract"),
        PathBuf::from("/nonexistent/tessdata"),
        1,
    );

    let result = engine
        .recognize(b"image", &Language::parse("eng").unwrap())
        .await;

    assert!(matches!(result, Err(OcrEngineError::SpawnFailed(_))));
}

/// Drives the engine against a stand-in `tesseract` script. Kept in one test so the
/// script is written before any child process is forked from this test.
#[cfg(unix)]
#[tokio::test]
async fn given_stand_in_binary_when_recognizing_then_passes_arguments_and_maps_exit_status() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::TempDir::new().unwrap();
    let script = dir.path().join("tesseract");
    std::fs::write(
        &script,
        "#!/bin/sh\n\
         case \"$8\" in\n\
           bad) echo \"Failed loading language '$8'\" >&2; exit 1 ;;\n\
           latin1) printf '\\377\\376' ; exit 0 ;;\n\
         esac\n\
         printf '%s|' \"$@\"\n\
         cat\n",
    )
    .unwrap();
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

    let engine = TesseractEngine::new(script, PathBuf::from("/data/tessdata"), 1);

    let text = engine
        .recognize(b"pixels", &Language::parse("eng+deu").unwrap())
        .await
        .unwrap();
    assert_eq!(
        text,
        "stdin|stdout|--tessdata-dir|/data/tessdata|--oem|1|-l|eng+deu|pixels"
    );

    let failed = engine
        .recognize(b"pixels", &Language::parse("bad").unwrap())
        .await;
    match failed {
        Err(OcrEngineError::RecognitionFailed(msg)) => {
            assert!(msg.contains("Failed loading language 'bad'"), "{msg}")
        }
        other => panic!("unexpected result: {other:?}"),
    }

    let garbled = engine
        .recognize(b"pixels", &Language::parse("latin1").unwrap())
        .await;
    assert!(matches!(garbled, Err(OcrEngineError::InvalidOutput(_))));
}
