//! Given steps for board sync BDD scenarios.

use super::world::{BoardSyncWorld, run_async};
use crate::test_helpers::now;
use chrono::Duration;
use eyre::WrapErr;
use rstest_bdd_macros::given;

#[given(r#"a card "{card}" named "{name}" in list "{list}""#)]
fn card_in_list(world: &mut BoardSyncWorld, card: String, name: String, list: String) {
    world.fixture.put_card(&card, &name, &list, None);
}

#[given("the board has been imported")]
fn board_imported(world: &mut BoardSyncWorld) -> Result<(), eyre::Report> {
    let summary = run_async(world.importer.import_from_board())
        .wrap_err("import board for scenario setup")?;
    if !summary.failed().is_empty() {
        return Err(eyre::eyre!("setup import failed: {:?}", summary.failed()));
    }
    Ok(())
}

#[given(r#"card "{card}" now sits in list "{list}" due in {days:i64} days"#)]
fn card_moved_with_due(world: &mut BoardSyncWorld, card: String, list: String, days: i64) {
    world
        .fixture
        .put_card(&card, "Fix bug", &list, Some(now() + Duration::days(days)));
}
