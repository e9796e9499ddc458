// prompt_flow_tests.rs - 対話的なファイル名入力のテスト

mod support;

use glkfref::{
    EncodingError, FileMode, FileType, FileUsage, FilerefRegistry, FrefError, PromptOutcome,
    Session, SessionConfig,
};
use std::fs;
use support::{Line, ScriptedInput};
use tempfile::TempDir;

struct Fixture {
    temp_dir: TempDir,
    session: Session,
    registry: FilerefRegistry,
}

impl Fixture {
    fn new() -> Self {
        Self::with_config(SessionConfig::default())
    }

    fn with_config(config: SessionConfig) -> Self {
        let temp_dir = TempDir::new().unwrap();
        let mut session = Session::with_config(config);
        session.set_base_file(&format!("{}/story.z5", temp_dir.path().display()));
        Self {
            temp_dir,
            session,
            registry: FilerefRegistry::new(),
        }
    }

    fn dir(&self) -> String {
        self.temp_dir.path().display().to_string()
    }

    fn prompt(
        &mut self,
        input: &mut ScriptedInput,
        usage: FileUsage,
        mode: FileMode,
    ) -> glkfref::Result<PromptOutcome> {
        self.registry
            .create_by_prompt(&mut self.session, input, usage, mode, 77)
    }

    fn path_of(&self, outcome: PromptOutcome) -> String {
        let fref = outcome.fref().expect("expected a created fileref");
        self.registry.get(fref).unwrap().path().to_string()
    }
}

#[test]
fn test_prompt_text_and_default_prefill() {
    let mut fixture = Fixture::new();
    let mut input = ScriptedInput::new().line(Line::Keep);

    let outcome = fixture
        .prompt(&mut input, FileUsage::SAVED_GAME, FileMode::Write)
        .unwrap();

    assert_eq!(input.line_prompts, vec!["Enter saved game to store: "]);
    assert_eq!(input.initial_contents, vec!["story.glksave"]);
    assert_eq!(
        fixture.path_of(outcome),
        format!("{}/story.glksave", fixture.dir())
    );
    assert_eq!(fixture.registry.get_rock(outcome.fref().unwrap()), 77);
}

#[test]
fn test_read_mode_wording_per_usage() {
    let cases = [
        (FileUsage::TRANSCRIPT, "Enter transcript file to load: "),
        (FileUsage::INPUT_RECORD, "Enter command record file to load: "),
        (FileUsage::DATA, "Enter data file to load: "),
    ];
    for (usage, expected) in cases {
        let mut fixture = Fixture::new();
        let mut input = ScriptedInput::typing("x");
        fixture.prompt(&mut input, usage, FileMode::Read).unwrap();
        assert_eq!(input.line_prompts, vec![expected]);
    }
}

#[test]
fn test_prefill_disabled() {
    let mut fixture = Fixture::with_config(SessionConfig {
        prompt_defaults: false,
    });
    let mut input = ScriptedInput::new().line(Line::Keep);

    let outcome = fixture
        .prompt(&mut input, FileUsage::SAVED_GAME, FileMode::Write)
        .unwrap();

    assert_eq!(input.initial_contents, vec![""]);
    assert_eq!(outcome, PromptOutcome::Cancelled);
}

#[test]
fn test_input_is_trimmed_and_remembered() {
    let mut fixture = Fixture::new();
    let mut input = ScriptedInput::typing("   chapter two \r\n");

    let outcome = fixture
        .prompt(&mut input, FileUsage::TRANSCRIPT.text(), FileMode::WriteAppend)
        .unwrap();

    assert_eq!(
        fixture.path_of(outcome),
        format!("{}/chapter two.txt", fixture.dir())
    );
    assert_eq!(
        fixture.session.last_name(FileType::Transcript),
        "chapter two"
    );

    // 次回は記憶した名前が初期内容になる
    let mut again = ScriptedInput::new().line(Line::Cancel);
    fixture
        .prompt(&mut again, FileUsage::TRANSCRIPT, FileMode::Write)
        .unwrap();
    assert_eq!(again.initial_contents, vec!["chapter two"]);
}

#[test]
fn test_explicit_suffix_and_absolute_path() {
    let mut fixture = Fixture::new();
    let mut input = ScriptedInput::typing("notes.dat");
    let outcome = fixture
        .prompt(&mut input, FileUsage::DATA, FileMode::Write)
        .unwrap();
    assert_eq!(fixture.path_of(outcome), format!("{}/notes.dat", fixture.dir()));

    let absolute = format!("{}/elsewhere", fixture.dir());
    let mut input = ScriptedInput::typing(&absolute);
    let outcome = fixture
        .prompt(&mut input, FileUsage::DATA, FileMode::Write)
        .unwrap();
    assert_eq!(fixture.path_of(outcome), format!("{}.glkdata", absolute));
}

#[test]
fn test_cancellation_leaves_state_untouched() {
    let scripts = vec![
        ScriptedInput::new().line(Line::Cancel),
        ScriptedInput::typing(""),
        ScriptedInput::typing("   \r\n"),
    ];

    for mut input in scripts {
        let mut fixture = Fixture::new();
        let outcome = fixture
            .prompt(&mut input, FileUsage::SAVED_GAME, FileMode::Write)
            .unwrap();

        assert_eq!(outcome, PromptOutcome::Cancelled);
        assert!(fixture.registry.is_empty());
        assert_eq!(fixture.session.last_name(FileType::SavedGame), "story.glksave");
        assert!(fixture.registry.warnings().is_empty());
    }
}

#[test]
fn test_overwrite_declined() {
    let mut fixture = Fixture::new();
    let existing = format!("{}/taken.glksave", fixture.dir());
    fs::write(&existing, b"old game").unwrap();

    let mut input = ScriptedInput::typing("taken").chars("xn");
    let outcome = fixture
        .prompt(&mut input, FileUsage::SAVED_GAME, FileMode::Write)
        .unwrap();

    assert_eq!(outcome, PromptOutcome::Cancelled);
    // 不明なキーは無視して再度読む
    assert_eq!(
        input.char_prompts,
        vec!["Overwrite \"taken\"? [y/n] ", "Overwrite \"taken\"? [y/n] "]
    );
    assert_eq!(fs::read(&existing).unwrap(), b"old game");
    assert!(fixture.registry.is_empty());
    assert_eq!(fixture.session.last_name(FileType::SavedGame), "story.glksave");
}

#[test]
fn test_overwrite_declined_by_control_keys() {
    for key in [0x1b, 0x07, 'N' as u32, 0xffff_fff8] {
        let mut fixture = Fixture::new();
        fs::write(format!("{}/taken.glkdata", fixture.dir()), b"data").unwrap();

        let mut input = ScriptedInput::typing("taken").keys(&[key]);
        let outcome = fixture
            .prompt(&mut input, FileUsage::DATA, FileMode::ReadWrite)
            .unwrap();
        assert_eq!(outcome, PromptOutcome::Cancelled, "key {:#x}", key);
    }
}

#[test]
fn test_overwrite_accepted() {
    let mut fixture = Fixture::new();
    let existing = format!("{}/taken.glksave", fixture.dir());
    fs::write(&existing, b"old game").unwrap();

    let mut input = ScriptedInput::typing("taken").chars("?Y");
    let outcome = fixture
        .prompt(&mut input, FileUsage::SAVED_GAME, FileMode::Write)
        .unwrap();

    assert_eq!(fixture.path_of(outcome), existing);
    assert_eq!(input.char_prompts.len(), 2);
    assert_eq!(fs::read(&existing).unwrap(), b"old game");
    assert_eq!(fixture.session.last_name(FileType::SavedGame), "taken");
}

#[test]
fn test_no_confirmation_when_loading_or_for_directories() {
    let mut fixture = Fixture::new();
    fs::write(format!("{}/taken.glksave", fixture.dir()), b"old game").unwrap();
    fs::create_dir(format!("{}/folder.glksave", fixture.dir())).unwrap();

    let mut input = ScriptedInput::typing("taken");
    let outcome = fixture
        .prompt(&mut input, FileUsage::SAVED_GAME, FileMode::Read)
        .unwrap();
    assert!(!outcome.is_cancelled());

    let mut input = ScriptedInput::typing("folder");
    let outcome = fixture
        .prompt(&mut input, FileUsage::SAVED_GAME, FileMode::Write)
        .unwrap();
    assert!(!outcome.is_cancelled());
    assert!(input.char_prompts.is_empty());
}

#[test]
fn test_overlong_filename_is_an_error() {
    let mut fixture = Fixture::new();
    let long_name: String = std::iter::repeat('日').take(200).collect();
    let mut input = ScriptedInput::typing(&long_name);

    let result = fixture.prompt(&mut input, FileUsage::DATA, FileMode::Write);

    assert_eq!(
        result,
        Err(FrefError::Encoding {
            context: "filename",
            source: EncodingError::InsufficientSpace,
        })
    );
    assert_eq!(
        fixture.registry.take_warnings(),
        vec!["fileref_create_by_prompt: filename too long."]
    );
    assert_eq!(fixture.session.last_name(FileType::Data), "story.glkdata");
    assert!(fixture.registry.is_empty());
}

#[test]
fn test_overlong_default_is_an_error_before_input() {
    let mut fixture = Fixture::new();
    let stem = "s".repeat(300);
    fixture
        .session
        .set_base_file(&format!("{}/{}.z5", fixture.dir(), stem));

    let mut input = ScriptedInput::new().line(Line::Keep);
    let result = fixture.prompt(&mut input, FileUsage::SAVED_GAME, FileMode::Write);

    assert!(matches!(
        result,
        Err(FrefError::Encoding {
            context: "default filename",
            ..
        })
    ));
    assert!(input.line_prompts.is_empty());
}
