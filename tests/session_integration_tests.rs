use std::io::Write;
use std::sync::Arc;

use ratatui::Terminal;
use ratatui::backend::TestBackend;
use seekfirst::core::corpus::Corpus;
use seekfirst::core::loader::{self, LoadError};
use seekfirst::core::state::Session;
use seekfirst::tui::{InputExit, InputState, RenderOutcome, Renderer, View, draw_ui, input_loop};
use tempfile::NamedTempFile;
use tokio::sync::{Mutex, mpsc};

// ============================================================================
// Helper Functions
// ============================================================================

const CORPUS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<bible>
  <b>
    <c>
      <v>In the beginning God created the heavens and the earth.</v>
      <v>The earth was without form and void.</v>
    </c>
  </b>
  <b>
    <c><v>In the beginning was the Word.</v><v>He was in the beginning with God.</v></c>
    <c><v>On the third day there was a wedding at Cana.</v></c>
    <c>
      <v>Now there was a man of the Pharisees named Nicodemus.</v>
      <v>This man came to Jesus by night.</v>
      <v>Jesus answered him.</v>
      <v>Nicodemus said to him.</v>
      <v>Jesus answered, Truly, truly.</v>
      <v>That which is born of the flesh is flesh.</v>
      <v>Do not marvel that I said to you.</v>
      <v>The wind blows where it wishes.</v>
      <v>Nicodemus said to him, How can these things be?</v>
      <v>Jesus answered him, Are you the teacher of Israel?</v>
      <v>Truly, truly, I say to you.</v>
      <v>If I have told you earthly things.</v>
      <v>No one has ascended into heaven.</v>
      <v>And as Moses lifted up the serpent in the wilderness.</v>
      <v>That whoever believes in him may have eternal life.</v>
      <v>For God so loved the world, that he gave his only Son.</v>
      <v>For God did not send his Son into the world to condemn the world.</v>
    </c>
  </b>
</bible>"#;

const BOOKS_CSV: &str = "Genesis,Gen\nJohn,Jn\n";

fn temp_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn load_fixture() -> Corpus {
    let corpus = temp_file(CORPUS_XML);
    let books = temp_file(BOOKS_CSV);
    loader::load(corpus.path(), books.path()).unwrap()
}

/// Feeds `bytes` through the input loop, then runs one render pass.
async fn type_and_render(session: &Session, bytes: &[u8]) -> (InputExit, RenderOutcome, String) {
    let input = Arc::new(Mutex::new(InputState::new()));
    let (tx, mut rx) = mpsc::channel(1);
    let mock = tokio_test::io::Builder::new().read(bytes).build();

    let exit = input_loop(mock, input.clone(), tx).await;
    assert!(rx.try_recv().is_ok(), "input loop never requested a render");

    let mut renderer = Renderer::new(session);
    let mut state = input.lock().await;
    let outcome = renderer.step(&mut state);
    (exit, outcome, state.text.clone())
}

fn expect_paint(outcome: RenderOutcome) -> View {
    match outcome {
        RenderOutcome::Paint(view) => view,
        other => panic!("expected a paint, got {other:?}"),
    }
}

fn screen_text(view: &View, width: u16, height: u16) -> Vec<String> {
    let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
    terminal.draw(|f| draw_ui(f, view)).unwrap();
    let buffer = terminal.backend().buffer();
    (0..height)
        .map(|y| {
            (0..width)
                .map(|x| buffer[(x, y)].symbol())
                .collect::<String>()
                .trim_end()
                .to_string()
        })
        .collect()
}

// ============================================================================
// Loading
// ============================================================================

#[test]
fn test_load_from_disk() {
    let corpus = load_fixture();
    assert_eq!(corpus.books().len(), 2);
    assert_eq!(corpus.book(1).unwrap().chapters[2].verses.len(), 17);
    assert_eq!(corpus.find_book("john"), Some(1));
}

#[test]
fn test_book_table_row_count_must_match() {
    let corpus = temp_file(CORPUS_XML);
    let books = temp_file("Genesis,Gen\n");
    let err = loader::load(corpus.path(), books.path()).unwrap_err();
    assert!(matches!(err, LoadError::CountMismatch { books: 2, names: 1 }));
}

#[test]
fn test_malformed_corpus_is_fatal() {
    let corpus = temp_file("<bible><b><c><v>unterminated</c></b>");
    let books = temp_file(BOOKS_CSV);
    assert!(loader::load(corpus.path(), books.path()).is_err());
}

// ============================================================================
// Typing Sessions
// ============================================================================

#[tokio::test]
async fn test_typed_citation_renders_one_verse() {
    let session = Session::new(load_fixture());
    let (exit, outcome, text) = type_and_render(&session, b"john 3:16\x03").await;

    assert_eq!(exit, InputExit::Interrupted);
    assert_eq!(text, "john 3:16");
    let view = expect_paint(outcome);
    assert_eq!(view.listing.len(), 1);

    let screen = screen_text(&view, 70, 5);
    assert_eq!(screen[0], "Jn 3:16 For God so loved the world, that he gave his only Son.");
    assert_eq!(screen[4], "Search> john 3:16");
}

#[tokio::test]
async fn test_clamped_follow_up_fragment() {
    let session = Session::new(load_fixture());
    let (_, outcome, _) = type_and_render(&session, b"john 3:16, 3:99\x03").await;

    let view = expect_paint(outcome);
    let texts: Vec<String> = view.listing.iter().map(|l| l.text()).collect();
    assert_eq!(texts.len(), 2);
    assert!(texts[1].starts_with("Jn 3:17 For God did not send"));
}

#[tokio::test]
async fn test_editing_keys_before_render() {
    let session = Session::new(load_fixture());
    // "genesis 1" then Ctrl-W, Ctrl-U, retype with a typo fixed by backspace
    let (_, outcome, text) =
        type_and_render(&session, b"genesis 1\x17\x15jnn\x7f 1:1\x03").await;

    assert_eq!(text, "jn 1:1");
    let view = expect_paint(outcome);
    assert_eq!(view.listing[0].text(), "Jn 1:1 In the beginning was the Word.");
}

#[tokio::test]
async fn test_tab_completion_then_render() {
    let session = Session::new(load_fixture());
    let (_, outcome, text) = type_and_render(&session, b"Ge\t\x03").await;

    assert_eq!(text, "genesis");
    let view = expect_paint(outcome);
    assert_eq!(view.suggestion, "");
    assert_eq!(view.listing[0].text(), "genesis (chapter not found)");
}

#[tokio::test]
async fn test_search_summary() {
    let session = Session::new(load_fixture());
    let (_, outcome, _) = type_and_render(&session, b"!beginning\x03").await;

    let view = expect_paint(outcome);
    let texts: Vec<String> = view.listing.iter().map(|l| l.text()).collect();
    assert_eq!(texts.len(), 4);
    assert_eq!(texts[3], "\"beginning\" Jn (2) Gen (1) [3]");
}

#[tokio::test]
async fn test_quit_token_ends_session() {
    let session = Session::new(load_fixture());
    let (_, outcome, _) = type_and_render(&session, b"john 3:16, quit, john 1\x03").await;
    assert_eq!(outcome, RenderOutcome::Quit);
}

#[tokio::test]
async fn test_read_error_is_treated_as_quit() {
    let input = Arc::new(Mutex::new(InputState::new()));
    let (tx, _rx) = mpsc::channel(1);
    let mock = tokio_test::io::Builder::new()
        .read(b"jo")
        .read_error(std::io::Error::other("tty gone"))
        .build();

    let exit = input_loop(mock, input.clone(), tx).await;

    assert_eq!(exit, InputExit::StreamClosed);
    assert_eq!(input.lock().await.text, "jo");
}
