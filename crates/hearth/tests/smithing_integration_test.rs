//! Integration tests for the anvil from config to finished item.

use std::sync::Arc;

use hearth::shared::{BlockFacing, VoxelPos};
use hearth::smithing::{SmithingAction, VoxelMaterial};
use hearth::{AnvilBlockEntity, AttributeTree, HearthConfig};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const CONFIG: &str = r########"
[smithing]
upset_cone_degrees = 25.0

[[smithing.recipes]]
code = "plate"
ingredient = "ingot-iron"
output = "metalplate-iron"
output_quantity = 2
pattern = [["#######", "#######", "#######"]]

[[smithing.recipes]]
code = "bar"
ingredient = "ingot-iron"
output = "bar-iron"
pattern = [
    ["#######", "#######", "#######"],
    ["#######", "#######", "#######"],
]
"########;

fn anvil() -> AnvilBlockEntity {
    let config = HearthConfig::from_toml_str(CONFIG).unwrap();
    let book = Arc::new(config.smithing.recipe_book().unwrap());
    AnvilBlockEntity::new(book, &config.smithing)
}

#[test]
fn test_split_ingot_into_plate() {
    let anvil = anvil();
    anvil.place_ingot("ingot-iron").unwrap();
    anvil.select_recipe("plate").unwrap();
    anvil.rotate_work_item(true);

    // Work in the rotated frame: the bar now runs along Z.
    let grid = anvil.grid_snapshot().unwrap();
    let top: Vec<VoxelPos> = grid
        .selection_boxes()
        .into_iter()
        .map(|(pos, _)| pos)
        .filter(|pos| pos.y == 1)
        .collect();
    assert_eq!(top.len(), 21);

    let mut outputs = Vec::new();
    for pos in top {
        if let Some(out) = anvil.strike(SmithingAction::Split(pos)).unwrap() {
            outputs.push(out);
        }
    }
    assert_eq!(outputs.len(), 1);
    assert_eq!(outputs[0].item, "metalplate-iron");
    assert_eq!(outputs[0].quantity, 2);
    assert!(anvil.grid_snapshot().is_none());
}

#[test]
fn test_strokes_conserve_metal() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let anvil = anvil();
    anvil.place_ingot("ingot-iron").unwrap();
    anvil.place_ingot("ingot-iron").unwrap();

    for _ in 0..500 {
        let pos = VoxelPos::new(rng.gen_range(0..16), rng.gen_range(0..6), rng.gen_range(0..16));
        let action = if rng.gen_bool(0.5) {
            SmithingAction::Hit(pos)
        } else {
            SmithingAction::Upset {
                pos,
                towards: BlockFacing::HORIZONTALS[rng.gen_range(0..4)],
            }
        };
        assert_eq!(anvil.strike(action).unwrap(), None);
        if rng.gen_bool(0.05) {
            anvil.rotate_work_item(rng.gen_bool(0.5));
        }
    }

    let grid = anvil.grid_snapshot().unwrap();
    assert_eq!(grid.count(VoxelMaterial::Metal), 84);
    assert_eq!(grid.count(VoxelMaterial::Slag), 0);
}

#[test]
fn test_work_in_progress_survives_reload() {
    let config = HearthConfig::from_toml_str(CONFIG).unwrap();
    let book = Arc::new(config.smithing.recipe_book().unwrap());

    let anvil = AnvilBlockEntity::new(Arc::clone(&book), &config.smithing);
    anvil.place_ingot("ingot-iron").unwrap();
    anvil.select_recipe("bar").unwrap();
    anvil.strike(SmithingAction::Split(VoxelPos::new(4, 1, 6))).unwrap();

    let mut tree = AttributeTree::new();
    anvil.to_tree_attributes(&mut tree);
    let restored = AnvilBlockEntity::from_tree_attributes(&tree, book, &config.smithing);

    assert_eq!(restored.grid_snapshot(), anvil.grid_snapshot());
    assert!(!restored.matches_recipe());
    assert_eq!(restored.available_recipes(), vec!["bar", "plate"]);
}
