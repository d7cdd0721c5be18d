//! Mood tracker tests: classification, history and export on every exit path

mod test_helpers;

use affect_monitor::app::{AppConfig, GuiMode, MoodApp};
use affect_monitor::capture::VideoSource;
use affect_monitor::mood::Mood;
use chrono::NaiveDate;
use opencv::core::{Mat, Point, Rect, Scalar};
use opencv::imgproc;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use test_helpers::{solid_frame, FixedDetector, ScriptedSource};

const FACE: Rect = Rect {
    x: 10,
    y: 10,
    width: 60,
    height: 60,
};

fn config_in(dir: &Path) -> AppConfig {
    let mut config = AppConfig::new(VideoSource::Camera(0));
    config.gui_mode = GuiMode::None;
    config.settings.export.mood_csv = dir.join("mood_history.csv");
    config.settings.export.mood_chart = dir.join("mood_distribution.png");
    config
}

fn mood_app(dir: &Path, source: ScriptedSource, faces: Vec<Rect>) -> MoodApp {
    MoodApp::with_components(config_in(dir), Box::new(source), Box::new(FixedDetector::new(faces)))
}

fn csv_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path).unwrap().lines().map(str::to_string).collect()
}

/// Bright face with a dark outline drawn across its lower half
fn busy_bright_frame() -> Mat {
    let mut frame = solid_frame(100, 100, 220.0);
    imgproc::rectangle_points(
        &mut frame,
        Point::new(20, 45),
        Point::new(60, 65),
        Scalar::all(0.0),
        2,
        imgproc::LINE_8,
        0,
    )
    .unwrap();
    frame
}

fn timestamp() -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_hms_opt(12, 30, 5).unwrap()
}

#[test]
fn test_uniform_frames_are_neutral_and_exported() {
    let dir = TempDir::new().unwrap();
    let frames = vec![solid_frame(100, 100, 128.0); 3];
    let mut app = mood_app(dir.path(), ScriptedSource::new(frames), vec![FACE]);

    app.run().unwrap();

    assert_eq!(app.log().len(), 3);
    assert!(app.log().records().iter().all(|r| r.mood == Mood::Neutral));

    let lines = csv_lines(&app.csv_path());
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "timestamp,mood");
    for line in &lines[1..] {
        let (stamp, mood) = line.split_once(',').unwrap();
        assert_eq!(mood, "neutral");
        assert!(chrono::NaiveDateTime::parse_from_str(stamp, "%Y-%m-%d %H:%M:%S").is_ok());
    }
    assert!(app.chart_path().exists());
}

#[test]
fn test_empty_stream_writes_header_only() {
    let dir = TempDir::new().unwrap();
    let mut app = mood_app(dir.path(), ScriptedSource::new(Vec::new()), vec![FACE]);

    app.run().unwrap();

    assert_eq!(csv_lines(&app.csv_path()), vec!["timestamp,mood".to_string()]);
    assert!(!app.chart_path().exists());
}

#[test]
fn test_history_exported_after_read_error() {
    let dir = TempDir::new().unwrap();
    let source = ScriptedSource::new(vec![solid_frame(100, 100, 128.0); 2]).failing_at_end();
    let released = source.release_counter();
    let mut app = mood_app(dir.path(), source, vec![FACE]);

    assert!(app.run().is_err());

    assert_eq!(released.get(), 1);
    assert_eq!(csv_lines(&app.csv_path()).len(), 3);
    assert!(app.chart_path().exists());
}

#[test]
fn test_dark_flat_face_is_sad() {
    let dir = TempDir::new().unwrap();
    let mut app = mood_app(dir.path(), ScriptedSource::new(Vec::new()), vec![FACE]);
    let mut frame = solid_frame(100, 100, 40.0);

    let moods = app.process_frame(&mut frame, timestamp()).unwrap();
    assert_eq!(moods, vec![(FACE, Mood::Sad)]);
}

#[test]
fn test_bright_busy_face_is_happy() {
    let dir = TempDir::new().unwrap();
    let mut app = mood_app(dir.path(), ScriptedSource::new(Vec::new()), vec![FACE]);
    let mut frame = busy_bright_frame();

    let moods = app.process_frame(&mut frame, timestamp()).unwrap();
    assert_eq!(moods, vec![(FACE, Mood::Happy)]);
}

#[test]
fn test_every_face_is_logged() {
    let dir = TempDir::new().unwrap();
    let faces = vec![Rect::new(0, 0, 40, 40), Rect::new(50, 50, 40, 40)];
    let mut app = mood_app(dir.path(), ScriptedSource::new(Vec::new()), faces.clone());
    let mut frame = solid_frame(100, 100, 128.0);

    let moods = app.process_frame(&mut frame, timestamp()).unwrap();

    assert_eq!(moods.len(), 2);
    assert_eq!(app.log().len(), 2);
    assert!(app.log().records().iter().all(|r| r.timestamp == timestamp()));
}

#[test]
fn test_face_outside_frame_is_skipped() {
    let dir = TempDir::new().unwrap();
    let mut app = mood_app(dir.path(), ScriptedSource::new(Vec::new()), vec![Rect::new(200, 200, 40, 40)]);
    let mut frame = solid_frame(100, 100, 128.0);

    assert!(app.process_frame(&mut frame, timestamp()).unwrap().is_empty());
    assert!(app.log().is_empty());
}
