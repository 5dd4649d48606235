use pretty_assertions::assert_eq;
use quire_engine::model::build::{code_block, doc, em, link, p, p_with, strong, styled, text};
use quire_engine::{Pos, Step, Style, StyleSpec, StyleStep, StyleType, Transform};

fn pos(path: &[usize], offset: usize) -> Pos {
    Pos::new(path.to_vec(), offset)
}

#[test]
fn adding_over_a_gap_is_one_step() {
    let mut tr = Transform::new(doc(vec![p_with(vec![em("ab"), text("cd"), em("ef")])]));

    tr.add_style(&pos(&[0], 0), &pos(&[0], 6), &Style::Strong).unwrap();

    assert_eq!(
        tr.steps(),
        &[Step::AddStyle(StyleStep::new(pos(&[0], 0), pos(&[0], 6), Style::Strong))]
    );
    insta::assert_snapshot!(
        tr.doc().to_string(),
        @r#"doc(paragraph(strong(em("ab")), strong("cd"), strong(em("ef"))))"#
    );
}

#[test]
fn conflicting_value_is_removed_where_it_was() {
    let mut tr = Transform::new(doc(vec![p_with(vec![
        link("ab", "old"),
        text("cd"),
        link("ef", "old"),
    ])]));

    tr.add_style(&pos(&[0], 1), &pos(&[0], 6), &Style::link("new")).unwrap();

    let removals: Vec<(Pos, Pos)> = tr
        .steps()
        .iter()
        .filter(|step| step.name() == "removeStyle")
        .map(|step| (step.range().0.clone(), step.range().1.clone()))
        .collect();
    assert_eq!(
        removals,
        vec![(pos(&[0], 4), pos(&[0], 6)), (pos(&[0], 1), pos(&[0], 2))]
    );
    assert_eq!(
        tr.doc(),
        &doc(vec![p_with(vec![link("a", "old"), link("bcdef", "new")])])
    );
}

#[test]
fn add_skips_plain_text_blocks() {
    let mut tr = Transform::new(doc(vec![p("ab"), code_block("let x;"), p("cd")]));

    tr.add_style(&pos(&[0], 0), &pos(&[2], 2), &Style::Em).unwrap();

    assert_eq!(tr.steps().len(), 2);
    assert_eq!(
        tr.doc(),
        &doc(vec![p_with(vec![em("ab")]), code_block("let x;"), p_with(vec![em("cd")])])
    );
}

#[test]
fn remove_by_type() {
    let mut tr = Transform::new(doc(vec![p_with(vec![
        styled("ab", &[Style::Strong, Style::Em]),
        strong("cd"),
    ])]));

    tr.remove_style(&pos(&[0], 0), &pos(&[0], 4), &StyleSpec::Type(StyleType::Strong))
        .unwrap();

    assert_eq!(tr.steps().len(), 1);
    assert_eq!(tr.doc(), &doc(vec![p_with(vec![em("ab"), text("cd")])]));
}

#[test]
fn style_steps_map_positions_unchanged() {
    let mut tr = Transform::new(doc(vec![p("abc"), p("def")]));

    tr.add_style(&pos(&[0], 1), &pos(&[1], 2), &Style::Code).unwrap();

    assert_eq!(tr.map(&pos(&[1], 1)).pos, pos(&[1], 1));
    assert_eq!(tr.undo().unwrap(), doc(vec![p("abc"), p("def")]));
}
