use tdoc::InlineStyle;

use super::EntityKey;

/// Per-character annotations: the inline styles in effect and the entity, if any.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CharacterMetadata {
    styles: Vec<InlineStyle>,
    entity: Option<EntityKey>,
}

impl CharacterMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_styles(mut self, styles: impl IntoIterator<Item = InlineStyle>) -> Self {
        for style in styles {
            self = self.apply_style(style);
        }
        self
    }

    pub fn with_entity(mut self, entity: Option<EntityKey>) -> Self {
        self.entity = entity;
        self
    }

    pub fn entity(&self) -> Option<EntityKey> {
        self.entity
    }

    pub fn styles(&self) -> &[InlineStyle] {
        &self.styles
    }

    pub fn has_style(&self, style: InlineStyle) -> bool {
        self.styles.contains(&style)
    }

    /// Returns a copy pointing at `entity`, leaving the styles untouched.
    pub fn apply_entity(&self, entity: Option<EntityKey>) -> Self {
        Self {
            styles: self.styles.clone(),
            entity,
        }
    }

    pub fn clear_entity(&self) -> Self {
        self.apply_entity(None)
    }

    pub fn apply_style(&self, style: InlineStyle) -> Self {
        let mut next = self.clone();
        if style != InlineStyle::None && !next.styles.contains(&style) {
            next.styles.push(style);
        }
        next
    }

    pub fn remove_style(&self, style: InlineStyle) -> Self {
        let mut next = self.clone();
        next.styles.retain(|existing| *existing != style);
        next
    }

    /// Style sets compare without regard to the order styles were applied in.
    pub fn same_styles(&self, other: &CharacterMetadata) -> bool {
        self.styles.len() == other.styles.len()
            && self.styles.iter().all(|style| other.styles.contains(style))
    }
}

pub fn inline_style_label(style: InlineStyle) -> Option<&'static str> {
    match style {
        InlineStyle::None => None,
        InlineStyle::Bold => Some("Bold"),
        InlineStyle::Italic => Some("Italic"),
        InlineStyle::Highlight => Some("Highlight"),
        InlineStyle::Underline => Some("Underline"),
        InlineStyle::Strike => Some("Strikethrough"),
        InlineStyle::Link => Some("Link"),
        InlineStyle::Code => Some("Code"),
    }
}
