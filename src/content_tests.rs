use std::collections::BTreeMap;

use pretty_assertions::assert_eq;
use tdoc::InlineStyle;

use super::*;

fn two_block_state() -> ContentState {
    ContentState::from_blocks(
        vec![ContentBlock::new("one", "Hello"), ContentBlock::new("two", "World")],
        EntityMap::new(),
    )
    .expect("unique keys")
}

#[test]
fn from_text_splits_lines_into_blocks() {
    let content = ContentState::from_text("foo\nbar baz\n");
    let keys: Vec<&str> = content.block_keys().map(BlockKey::as_str).collect();
    assert_eq!(keys, vec!["b0", "b1", "b2"]);
    assert_eq!(content.plain_text(), "foo\nbar baz\n");
    assert_eq!(content.selection_after(), &SelectionState::collapsed("b0", 0));
}

#[test]
fn empty_block_list_yields_one_empty_block() {
    let content = ContentState::from_blocks(Vec::new(), EntityMap::new()).expect("no blocks");
    assert_eq!(content.block_count(), 1);
    assert_eq!(content.plain_text(), "");
}

#[test]
fn duplicate_block_keys_are_rejected() {
    let err = ContentState::from_blocks(
        vec![
            ContentBlock::new("a", "first"),
            ContentBlock::new("b", "middle"),
            ContentBlock::new("a", "second"),
        ],
        EntityMap::new(),
    )
    .unwrap_err();
    assert_eq!(err, ContentError::DuplicateBlock(BlockKey::from("a")));
}

#[test]
fn merge_blocks_replaces_in_place_and_shares_the_rest() {
    let content = two_block_state();
    let updated = content.merge_blocks(vec![ContentBlock::new("one", "Howdy")]);

    assert_eq!(updated.plain_text(), "Howdy\nWorld");
    assert_eq!(content.plain_text(), "Hello\nWorld");
    assert!(updated.shares_block_with(&content, &BlockKey::from("two")));
    assert!(!updated.shares_block_with(&content, &BlockKey::from("one")));
    assert!(!updated.shares_block_map_with(&content));
}

#[test]
fn merge_blocks_stores_shared_blocks_as_given() {
    let content = two_block_state();
    let block = Arc::new(ContentBlock::new("two", "Earth"));
    let updated = content.merge_blocks(vec![Arc::clone(&block)]);

    let stored = updated.block_for_key(&BlockKey::from("two")).expect("merged block");
    assert!(Arc::ptr_eq(stored, &block));
    assert!(updated.shares_block_with(&content, &BlockKey::from("one")));
}

#[test]
fn merge_into_large_document_keeps_order_and_shares_untouched_blocks() {
    let blocks = (0..10_000).map(|idx| ContentBlock::new(format!("b{idx}"), "text"));
    let content = ContentState::from_blocks(blocks, EntityMap::new()).expect("unique keys");
    let updated = content.merge_blocks(vec![ContentBlock::new("b5000", "edited")]);

    assert_eq!(updated.block_count(), 10_000);
    assert!(
        updated
            .block_keys()
            .zip(content.block_keys())
            .all(|(left, right)| left == right)
    );
    let edited = BlockKey::from("b5000");
    assert_eq!(updated.get_block(&edited).map(ContentBlock::text), Some("edited"));
    assert_eq!(content.get_block(&edited).map(ContentBlock::text), Some("text"));
    for idx in [0, 4999, 5001, 9999] {
        assert!(updated.shares_block_with(&content, &BlockKey::from(format!("b{idx}"))));
    }
}

#[test]
fn merge_blocks_appends_unknown_keys() {
    let content = two_block_state().merge_blocks(vec![ContentBlock::new("three", "!")]);
    let keys: Vec<&str> = content.block_keys().map(BlockKey::as_str).collect();
    assert_eq!(keys, vec!["one", "two", "three"]);
}

#[test]
fn selection_updates_share_blocks() {
    let content = two_block_state();
    let selection = SelectionState::new("one", 1, "two", 2);
    let updated = content
        .with_selection_before(selection.clone())
        .with_selection_after(selection.clone());
    assert!(updated.shares_block_map_with(&content));
    assert_eq!(updated.selection_before(), &selection);
    assert_eq!(updated.selection_after(), &selection);
}

#[test]
fn block_for_key_reports_unknown_keys() {
    let content = two_block_state();
    assert!(content.block_for_key(&BlockKey::from("two")).is_ok());
    assert_eq!(
        content.block_for_key(&BlockKey::from("missing")).unwrap_err(),
        ContentError::UnknownBlock(BlockKey::from("missing"))
    );
}

#[test]
fn create_entity_leaves_previous_state_untouched() {
    let content = two_block_state();
    let (updated, key) =
        content.create_entity(EntityInstance::new("LINK", Mutability::Immutable));
    assert!(content.entity_map().is_empty());
    assert_eq!(updated.entity(key).map(EntityInstance::entity_type), Ok("LINK"));
    assert!(updated.shares_block_map_with(&content));
}

#[test]
fn entity_keys_are_unique_and_increasing() {
    let mut map = EntityMap::new();
    let first = map.add(EntityInstance::new("A", Mutability::Mutable));
    let second = map.add(EntityInstance::new("B", Mutability::Segmented));
    assert!(first < second);
    assert_eq!(map.len(), 2);
    assert_eq!(
        map.iter().map(|(key, _)| key).collect::<Vec<_>>(),
        vec![first, second]
    );
}

#[test]
fn entity_lookup_fails_loudly() {
    let map = EntityMap::new();
    let key = EntityKey::new(7);
    assert_eq!(map.get(key).unwrap_err(), ContentError::UnknownEntity(key));
    assert!(map.try_get(key).is_none());
}

#[test]
fn entity_data_updates_copy_on_write() {
    let mut map = EntityMap::new();
    let key = map.add(
        EntityInstance::new("LINK", Mutability::Mutable).with_data("url", "https://a.example"),
    );
    let snapshot = map.clone();
    assert!(snapshot.shares_entries_with(&map));

    map.merge_data(key, [("url", "https://b.example"), ("title", "B")])
        .expect("entity exists");
    assert!(!snapshot.shares_entries_with(&map));
    assert_eq!(
        snapshot.get(key).expect("entity").data().get("url").map(String::as_str),
        Some("https://a.example")
    );
    assert_eq!(map.get(key).expect("entity").data().len(), 2);

    map.replace_data(key, BTreeMap::new()).expect("entity exists");
    assert!(map.get(key).expect("entity").data().is_empty());
    assert_eq!(
        map.replace_data(EntityKey::new(99), BTreeMap::new()),
        Err(ContentError::UnknownEntity(EntityKey::new(99)))
    );
}

#[test]
fn mutability_display_and_default() {
    assert_eq!(Mutability::default(), Mutability::Mutable);
    assert!(Mutability::Mutable.is_mutable());
    assert!(!Mutability::Segmented.is_mutable());
    assert_eq!(Mutability::Immutable.to_string(), "IMMUTABLE");
}

#[test]
fn selection_edges_follow_direction() {
    let forward = SelectionState::new("a", 3, "b", 1);
    assert_eq!(forward.start_key().as_str(), "a");
    assert_eq!(forward.start_offset(), 3);
    assert_eq!(forward.end_key().as_str(), "b");
    assert_eq!(forward.end_offset(), 1);
    assert!(!forward.is_collapsed());

    let backward = forward.clone().with_backward(true);
    assert_eq!(backward.start_key().as_str(), "b");
    assert_eq!(backward.start_offset(), 1);
    assert_eq!(backward.end_key().as_str(), "a");
    assert_eq!(backward.end_offset(), 3);
    assert_eq!(backward.anchor_key(), forward.anchor_key());
    assert_eq!(backward.focus_offset(), forward.focus_offset());
}

#[test]
fn collapsed_selection_has_equal_edges() {
    let selection = SelectionState::collapsed("a", 4);
    assert!(selection.is_collapsed());
    assert_eq!(selection.start_key(), selection.end_key());
    assert_eq!(selection.start_offset(), 4);
    assert!(!SelectionState::new("a", 2, "a", 8).is_collapsed());
}

#[test]
fn character_metadata_transforms_are_pure() {
    let key = EntityKey::new(1);
    let original = CharacterMetadata::new()
        .with_styles([InlineStyle::Bold])
        .with_entity(Some(key));
    let cleared = original.clear_entity();

    assert_eq!(original.entity(), Some(key));
    assert_eq!(cleared.entity(), None);
    assert!(cleared.has_style(InlineStyle::Bold));

    let styled = cleared.apply_style(InlineStyle::Italic).apply_style(InlineStyle::Italic);
    assert_eq!(styled.styles().len(), 2);
    assert!(!styled.remove_style(InlineStyle::Bold).has_style(InlineStyle::Bold));
    assert!(
        styled.same_styles(
            &CharacterMetadata::new().with_styles([InlineStyle::Italic, InlineStyle::Bold])
        )
    );
    assert_eq!(inline_style_label(InlineStyle::Strike), Some("Strikethrough"));
    assert_eq!(inline_style_label(InlineStyle::None), None);
}

#[test]
fn block_from_parts_checks_lengths() {
    let err = ContentBlock::from_parts("x", "abc", vec![CharacterMetadata::new(); 2]).unwrap_err();
    assert_eq!(
        err,
        ContentError::LengthMismatch {
            block: BlockKey::from("x"),
            text_len: 3,
            characters: 2,
        }
    );
    // Offsets count characters, not bytes.
    let block = ContentBlock::from_parts("y", "né", vec![CharacterMetadata::new(); 2])
        .expect("lengths match");
    assert_eq!(block.len(), 2);
}

#[test]
fn with_characters_checks_lengths() {
    let block = ContentBlock::new("x", "abc");
    assert_eq!(
        block.with_characters(Vec::new()).unwrap_err(),
        ContentError::LengthMismatch {
            block: BlockKey::from("x"),
            text_len: 3,
            characters: 0,
        }
    );

    let key = EntityKey::new(2);
    let replaced = block
        .with_characters(vec![CharacterMetadata::new().with_entity(Some(key)); 3])
        .expect("lengths match");
    assert_eq!(replaced.entity_at(1), Some(key));
    assert_eq!(block.entity_at(1), None);
}

#[test]
fn clear_entity_range_keeps_styles() {
    let key = EntityKey::new(4);
    let block = ContentBlock::new("x", "abcd")
        .with_style_range(0..4, InlineStyle::Bold)
        .with_entity_range(0..4, Some(key));
    let cleared = block.clear_entity_range(1..3);

    assert_eq!(cleared.entity_at(0), Some(key));
    assert_eq!(cleared.entity_at(1), None);
    assert_eq!(cleared.entity_at(2), None);
    assert_eq!(cleared.entity_at(3), Some(key));
    assert!(cleared.characters().iter().all(|c| c.has_style(InlineStyle::Bold)));
    assert_eq!(block.entity_at(1), Some(key));
}

#[test]
fn entity_ranges_report_runs_in_order() {
    let (one, two) = (EntityKey::new(1), EntityKey::new(2));
    let block = ContentBlock::new("x", "aa bb cc")
        .with_entity_range(0..2, Some(one))
        .with_entity_range(3..5, Some(two))
        .with_entity_range(6..8, Some(one));

    let mut ranges = Vec::new();
    block.find_entity_ranges(
        |character| character.entity() == Some(one),
        |start, end| ranges.push((start, end)),
    );
    assert_eq!(ranges, vec![(0, 2), (6, 8)]);

    let mut all = Vec::new();
    block.find_entity_ranges(|_| true, |start, end| all.push((start, end)));
    assert_eq!(all, vec![(0, 2), (2, 3), (3, 5), (5, 6), (6, 8)]);
    assert_eq!(block.entity_at(4), Some(two));
    assert_eq!(block.entity_at(8), None);
}

#[test]
fn style_ranges_ignore_style_order() {
    let block = ContentBlock::new("x", "abcdef")
        .with_style_range(0..2, InlineStyle::Bold)
        .with_style_range(0..2, InlineStyle::Italic)
        .with_style_range(2..4, InlineStyle::Italic)
        .with_style_range(2..4, InlineStyle::Bold);

    let mut ranges = Vec::new();
    block.find_style_ranges(
        |character| character.has_style(InlineStyle::Bold),
        |start, end| ranges.push((start, end)),
    );
    assert_eq!(ranges, vec![(0, 4)]);
    assert_eq!(block.inline_styles_at(5), &[] as &[InlineStyle]);
    assert_eq!(block.inline_styles_at(9), &[] as &[InlineStyle]);
}

#[test]
fn entity_range_is_clamped_and_keeps_text() {
    let key = EntityKey::new(3);
    let block = ContentBlock::new("x", "abc");
    let updated = block.with_entity_range(1..10, Some(key));
    assert_eq!(updated.entity_at(0), None);
    assert_eq!(updated.entity_at(2), Some(key));
    assert_eq!(updated.text(), "abc");
    assert!(!updated.shares_characters_with(&block));
    assert_eq!(block.entity_at(2), None);
}
