//! Stringboard: an infinite-canvas editor core for boards joined by beaded connectors.
//!
//! Entry point: runs a console demo of the editor session against the
//! in-memory store. The `stringboard-rpc` binary is the front-end bridge.

use std::error::Error;
use std::sync::Arc;

use stringboard::app::App;
use stringboard::managers::connector_editor::ConnectorEditorTrait;
use stringboard::services::memory_store::InMemoryTimelineService;
use stringboard::services::settings_engine::SettingsEngine;
use stringboard::types::board::Position;
use stringboard::types::connector_edit::ConnectorEditMode;
use stringboard::types::drag::DragKind;
use stringboard::types::settings::EditorSettings;

type DemoResult = Result<(), Box<dyn Error>>;

#[tokio::main]
async fn main() -> DemoResult {
    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║              Stringboard v{} — Demo Mode               ║", env!("CARGO_PKG_VERSION"));
    println!("║        Boards, bookmarks and beaded connectors             ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    let service = Arc::new(InMemoryTimelineService::new());
    let settings_path = std::env::temp_dir().join("stringboard-demo-settings.json");
    let settings = SettingsEngine::with_settings(
        settings_path.to_string_lossy().to_string(),
        EditorSettings::default(),
    );
    let mut app = App::new(service.clone(), settings);
    app.startup().await?;

    demo_boards(&mut app).await?;
    demo_connectors(&mut app).await?;
    demo_drag(&mut app).await?;
    demo_layout(&mut app).await?;
    demo_failure(&mut app, &service).await?;
    demo_cascade(&mut app).await?;

    println!();
    println!("═══════════════════════════════════════════════════════════════");
    println!("  ✅ Editor session demonstrated successfully!");
    println!("═══════════════════════════════════════════════════════════════");
    Ok(())
}

fn section(name: &str) {
    println!("───────────────────────────────────────────────────────────────");
    println!("  📦 {}", name);
    println!("───────────────────────────────────────────────────────────────");
}

async fn demo_boards(app: &mut App) -> DemoResult {
    section("Boards & Bookmarks");

    let research = app.add_board("Research").await?;
    let reading = app.add_board("Reading list").await?;
    println!("  {} at ({}, {})", research.title, research.position.x, research.position.y);
    println!("  {} at ({}, {})", reading.title, reading.position.x, reading.position.y);

    app.timeline
        .create_bookmark(&research.id, "Rust book", Some("https://doc.rust-lang.org/book/"))
        .await?;
    app.timeline
        .create_bookmark(&research.id, "Tokio tutorial", Some("https://tokio.rs/tokio/tutorial"))
        .await?;
    for entry in app.timeline.get_bookmarks_by_board(&research.id) {
        println!("    [{}] {}", entry.order, entry.title);
    }
    println!("  ✓ TimelineManager OK");
    println!();
    Ok(())
}

async fn demo_connectors(app: &mut App) -> DemoResult {
    section("Connector Authoring");

    let ids: Vec<String> = app.timeline.data().boards.iter().map(|b| b.id.clone()).collect();
    let (from, to) = match ids.as_slice() {
        [from, to, ..] => (from.clone(), to.clone()),
        _ => return Err("demo needs two boards".into()),
    };

    app.start_connector_edit(ConnectorEditMode::Create, None)?;
    app.select_source_board(&from)?;
    let ignored = !app.select_target_board(&from)?;
    println!("  Target equal to source ignored: {}", ignored);
    if let Err(err) = app.select_target_board("no-such-board") {
        println!("  Unknown target rejected: {}", err);
    }
    app.select_target_board(&to)?;
    println!("  State: {:?}", app.connector_editor.state());

    if let Some(preview) = app.preview_path() {
        println!("  Preview: {}", preview);
    }
    app.connector_editor.add_temp_bead(Position::new(400.0, 80.0))?;
    let connector = app.finish_connector_edit().await?;
    println!("  Created connector with {} bead(s)", connector.beads.len());

    for path in app.connector_paths() {
        println!("  {} → {}", path.connector_id, path.svg);
    }
    println!("  ✓ ConnectorEditor OK");
    println!();
    Ok(())
}

async fn demo_drag(app: &mut App) -> DemoResult {
    section("Drag Session");

    let board = app
        .timeline
        .data()
        .boards
        .first()
        .cloned()
        .ok_or("demo needs a board")?;
    app.start_drag(DragKind::Board, &board.id, Position::new(10.0, 10.0))?;
    app.update_drag(Position::new(57.0, 133.0))?;
    let live = app.live_board_positions();
    println!("  Committed: ({}, {})", board.position.x, board.position.y);
    if let Some(p) = live.get(&board.id) {
        println!("  Live:      ({}, {})", p.x, p.y);
    }
    app.end_drag(None).await?;
    if let Some(moved) = app.timeline.get_board_by_id(&board.id) {
        println!("  Dropped (snapped): ({}, {})", moved.position.x, moved.position.y);
    }
    println!("  ✓ DragManager OK");
    println!();
    Ok(())
}

async fn demo_layout(app: &mut App) -> DemoResult {
    section("Layout");

    app.add_board("Archive").await?;
    let ids: Vec<String> = app.timeline.data().boards.iter().map(|b| b.id.clone()).collect();
    let aligned = app.align_horizontally(&ids).await?;
    println!("  Align horizontally moved {} board(s)", aligned.len());
    let distributed = app.distribute_horizontally(&ids).await?;
    println!("  Distribute horizontally moved {} board(s)", distributed.len());
    for board in &app.timeline.data().boards {
        println!("    {:<14} ({}, {})", board.title, board.position.x, board.position.y);
    }
    println!("  ✓ Layout engine OK");
    println!();
    Ok(())
}

async fn demo_failure(app: &mut App, service: &InMemoryTimelineService) -> DemoResult {
    section("Persistence Failure");

    service.set_failing(true);
    let before = app.timeline.data().clone();
    if let Err(err) = app.add_board("Never saved").await {
        println!("  add_board failed: {}", err);
    }
    println!("  Data unchanged: {}", before == *app.timeline.data());
    if let Some(err) = app.timeline.last_error() {
        println!("  last_error: {}", err);
    }
    service.set_failing(false);
    println!("  ✓ No partial apply OK");
    println!();
    Ok(())
}

async fn demo_cascade(app: &mut App) -> DemoResult {
    section("Cascading Delete");

    let board_id = app
        .timeline
        .data()
        .boards
        .first()
        .map(|b| b.id.clone())
        .ok_or("demo needs a board")?;
    app.timeline.delete_board(&board_id).await?;
    let data = app.timeline.data();
    println!(
        "  Remaining: {} boards, {} bookmarks, {} connectors",
        data.boards.len(),
        data.bookmarks.len(),
        data.connectors.len()
    );
    println!("  Referentially intact: {}", data.is_referentially_intact());
    println!("  ✓ Cascade OK");
    Ok(())
}
