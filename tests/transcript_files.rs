use std::io::Write;

use cuetrack::{Error, IngestPolicy, OutputType, Transcription};

fn write_fixture(contents: &str) -> anyhow::Result<tempfile::NamedTempFile> {
    let mut file = tempfile::NamedTempFile::new()?;
    file.write_all(contents.as_bytes())?;
    file.flush()?;
    Ok(file)
}

#[test]
fn loads_searches_and_exports_from_disk() -> anyhow::Result<()> {
    let fixture = write_fixture(
        r#"[
            {"id": "1", "start": 0, "end": 2, "text": "Hello world"},
            {"id": "2", "start": 2, "end": 4, "text": "Goodbye"},
            {"id": "3", "start": 4, "end": 6, "text": "HELLO again"}
        ]"#,
    )?;

    let t = Transcription::from_json(std::fs::File::open(fixture.path())?, IngestPolicy::Strict)?;

    let hits: Vec<&str> = t.search("hello").map(|s| s.id.as_str()).collect();
    assert_eq!(hits, ["1", "3"]);
    assert_eq!(t.search("").count(), 3);
    assert_eq!(t.active_at(2.0).map(|s| s.id.as_str()), Some("2"));
    assert_eq!(t.active_at(6.0), None);

    let mut vtt = Vec::new();
    cuetrack::export(&t, &mut vtt, OutputType::Vtt)?;
    let vtt = String::from_utf8(vtt)?;
    assert!(vtt.starts_with("WEBVTT\n\n1\n00:00:00.000 --> 00:00:02.000\nHello world\n"));
    Ok(())
}

#[test]
fn sort_policy_repairs_shuffled_payloads() -> anyhow::Result<()> {
    let fixture = write_fixture(
        r#"[
            {"id": "b", "start": 3, "end": 5, "text": "second"},
            {"id": "a", "start": 0, "end": 3, "text": "first"}
        ]"#,
    )?;

    let lenient =
        Transcription::from_json(std::fs::File::open(fixture.path())?, IngestPolicy::Lenient)?;
    assert!(!lenient.is_well_formed());

    let sorted = Transcription::from_json(std::fs::File::open(fixture.path())?, IngestPolicy::Sort)?;
    assert!(sorted.is_well_formed());
    assert_eq!(sorted.segments()[0].id, "a");

    let strict = Transcription::from_json(std::fs::File::open(fixture.path())?, IngestPolicy::Strict);
    assert!(matches!(strict, Err(Error::Malformed(_))));
    Ok(())
}

#[test]
fn edited_transcript_exports_edits() -> anyhow::Result<()> {
    let mut t = Transcription::from_json(
        r#"[{"id": "x", "start": 1, "end": 2, "text": "teh typo"}]"#.as_bytes(),
        IngestPolicy::Strict,
    )?;
    t.edit_text("x", "the typo")?;
    t.retime("x", 1.0, 2.5)?;

    let mut srt = Vec::new();
    cuetrack::export(&t, &mut srt, OutputType::Srt)?;
    assert_eq!(
        String::from_utf8(srt)?,
        "1\n00:00:01,000 --> 00:00:02,500\nthe typo\n\n"
    );
    Ok(())
}
