use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::model::{ParagraphProperties, RunProperties, Style, StyleKind};

pub const NORMAL_STYLE_ID: &str = "Normal";

const MAX_CHAIN_HOPS: usize = 32;

/// Formatting every style ultimately inherits from.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentDefaults {
    pub run: RunProperties,
    pub paragraph: ParagraphProperties,
}

/// Formatting after walking a style chain down from the document default.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EffectiveProperties {
    pub run: RunProperties,
    pub paragraph: ParagraphProperties,
}

impl EffectiveProperties {
    fn apply(&mut self, run: &RunProperties, paragraph: &ParagraphProperties) {
        self.run.merge(run);
        self.paragraph.merge(paragraph);
    }

    pub fn outline_level(&self) -> Option<u8> {
        self.paragraph.outline_level
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StyleRegistry {
    defaults: DocumentDefaults,
    styles: Vec<Style>,
}

impl StyleRegistry {
    pub fn new(defaults: DocumentDefaults) -> Self {
        StyleRegistry { defaults, styles: Vec::new() }
    }

    /// Add a style; a later registration under the same id replaces the earlier one.
    pub fn register(&mut self, style: Style) {
        match self.styles.iter_mut().find(|s| s.id == style.id) {
            Some(existing) => {
                log::warn!("style {} registered twice; keeping the last definition", style.id);
                *existing = style;
            }
            None => self.styles.push(style),
        }
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.register(style);
        self
    }

    pub fn defaults(&self) -> &DocumentDefaults {
        &self.defaults
    }

    /// Registered styles in registration order.
    pub fn styles(&self) -> &[Style] {
        &self.styles
    }

    pub fn get(&self, id: &str) -> Option<&Style> {
        self.styles.iter().find(|s| s.id == id)
    }

    pub fn has_normal(&self) -> bool {
        self.get(NORMAL_STYLE_ID).is_some()
    }

    /// `Normal` exists even when nobody registered it.
    fn lookup(&self, id: &str) -> Result<Option<&Style>, Error> {
        match self.get(id) {
            Some(style) => Ok(Some(style)),
            None if id == NORMAL_STYLE_ID => Ok(None),
            None => Err(Error::UnknownStyle(id.to_string())),
        }
    }

    /// Ids from `id` up to the top of its `basedOn` chain, child first.
    fn chain<'a>(&'a self, id: &'a str) -> Result<Vec<&'a Style>, Error> {
        let mut chain: Vec<&Style> = Vec::new();
        let mut next = Some(id);
        while let Some(current) = next {
            if chain.len() >= MAX_CHAIN_HOPS || chain.iter().any(|s| s.id == current) {
                return Err(Error::CyclicStyle(id.to_string()));
            }
            let Some(style) = self.lookup(current)? else {
                break;
            };
            chain.push(style);
            next = style.based_on.as_deref();
        }
        Ok(chain)
    }

    pub fn resolve(&self, id: &str) -> Result<EffectiveProperties, Error> {
        let chain = self.chain(id)?;
        let mut props = EffectiveProperties {
            run: self.defaults.run.clone(),
            paragraph: self.defaults.paragraph.clone(),
        };
        for style in chain.iter().rev() {
            props.apply(&style.run, &style.paragraph);
        }
        Ok(props)
    }

    /// Formatting of one run: document default, paragraph style chain,
    /// character style chain, then the run's direct overrides.
    pub fn resolve_run(
        &self,
        paragraph_style: Option<&str>,
        run_style: Option<&str>,
        direct: &RunProperties,
    ) -> Result<RunProperties, Error> {
        let mut run = self
            .resolve(paragraph_style.unwrap_or(NORMAL_STYLE_ID))?
            .run;
        if let Some(id) = run_style {
            for style in self.chain(id)?.iter().rev() {
                run.merge(&style.run);
            }
        }
        run.merge(direct);
        Ok(run)
    }

    /// Check every registered style resolves and every `next` points somewhere.
    pub fn validate(&self) -> Result<(), Error> {
        self.styles.iter().try_for_each(|s| self.validate_style(&s.id))
    }

    pub fn validate_style(&self, id: &str) -> Result<(), Error> {
        self.resolve(id)?;
        if let Some(next) = self.lookup(id)?.and_then(|s| s.next.as_deref()) {
            self.lookup(next)?;
        }
        Ok(())
    }
}

/// Memoizing view over a registry for the length of one walk.
pub struct ResolvedStyles<'a> {
    registry: &'a StyleRegistry,
    cache: HashMap<&'a str, EffectiveProperties>,
}

impl<'a> ResolvedStyles<'a> {
    pub fn new(registry: &'a StyleRegistry) -> Self {
        ResolvedStyles { registry, cache: HashMap::new() }
    }

    pub fn resolve(&mut self, id: &'a str) -> Result<&EffectiveProperties, Error> {
        if !self.cache.contains_key(id) {
            let props = self.registry.resolve(id)?;
            self.cache.insert(id, props);
        }
        self.cache
            .get(id)
            .ok_or_else(|| Error::UnknownStyle(id.to_string()))
    }

    /// Resolve a paragraph style reference, checking it names a paragraph style.
    pub fn paragraph(&mut self, id: Option<&'a str>) -> Result<&EffectiveProperties, Error> {
        let id = id.unwrap_or(NORMAL_STYLE_ID);
        if let Some(style) = self.registry.get(id)
            && style.kind != StyleKind::Paragraph
        {
            log::warn!("character style {id} used as a paragraph style");
        }
        self.resolve(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Alignment, Style};

    fn registry() -> StyleRegistry {
        let defaults = DocumentDefaults {
            run: RunProperties::default().font("Arial").size(24),
            paragraph: ParagraphProperties::default(),
        };
        StyleRegistry::new(defaults)
            .with_style(
                Style::paragraph("Heading1", "Heading 1")
                    .based_on(NORMAL_STYLE_ID)
                    .next(NORMAL_STYLE_ID)
                    .with_run(RunProperties::default().size(32).bold().color("1F4E79"))
                    .with_paragraph(ParagraphProperties {
                        space_before: Some(360),
                        space_after: Some(180),
                        outline_level: Some(0),
                        ..ParagraphProperties::default()
                    }),
            )
            .with_style(
                Style::paragraph("Heading1Centered", "Heading 1 Centered")
                    .based_on("Heading1")
                    .with_run(RunProperties::default().color("2E75B6"))
                    .with_paragraph(ParagraphProperties {
                        alignment: Some(Alignment::Center),
                        ..ParagraphProperties::default()
                    }),
            )
            .with_style(Style::character("Strong", "Strong").with_run(RunProperties::default().bold()))
    }

    #[test]
    fn child_overrides_parent_and_default_falls_through() {
        let reg = registry();
        let props = reg.resolve("Heading1Centered").unwrap();
        assert_eq!(props.run.font.as_deref(), Some("Arial"));
        assert_eq!(props.run.size, Some(32));
        assert_eq!(props.run.color.as_deref(), Some("2E75B6"));
        assert_eq!(props.run.bold, Some(true));
        assert_eq!(props.paragraph.alignment, Some(Alignment::Center));
        assert_eq!(props.paragraph.space_before, Some(360));
        assert_eq!(props.outline_level(), Some(0));
    }

    #[test]
    fn implicit_normal_resolves_to_defaults() {
        let reg = registry();
        let props = reg.resolve(NORMAL_STYLE_ID).unwrap();
        assert_eq!(props.run, reg.defaults().run);
        assert!(!reg.has_normal());
    }

    #[test]
    fn unknown_style_is_reported() {
        let reg = registry();
        assert!(matches!(reg.resolve("Missing"), Err(Error::UnknownStyle(id)) if id == "Missing"));

        let reg = registry().with_style(Style::paragraph("Orphan", "Orphan").based_on("Gone"));
        assert!(matches!(reg.resolve("Orphan"), Err(Error::UnknownStyle(id)) if id == "Gone"));
    }

    #[test]
    fn cycles_are_reported() {
        let reg = StyleRegistry::default()
            .with_style(Style::paragraph("A", "A").based_on("B"))
            .with_style(Style::paragraph("B", "B").based_on("A"));
        assert!(matches!(reg.resolve("A"), Err(Error::CyclicStyle(_))));
        assert!(reg.validate().is_err());
    }

    #[test]
    fn long_chain_hits_hop_limit() {
        let mut reg = StyleRegistry::default();
        for i in 0..40 {
            reg.register(Style::paragraph(format!("S{i}"), format!("S{i}")).based_on(format!("S{}", i + 1)));
        }
        reg.register(Style::paragraph("S40", "S40"));
        assert!(matches!(reg.resolve("S0"), Err(Error::CyclicStyle(_))));
        assert!(reg.resolve("S20").is_ok());
    }

    #[test]
    fn run_resolution_layers_character_style_and_overrides() {
        let reg = registry();
        let direct = RunProperties::default().color("FFFFFF");
        let run = reg
            .resolve_run(Some("Heading1"), Some("Strong"), &direct)
            .unwrap();
        assert_eq!(run.size, Some(32));
        assert_eq!(run.bold, Some(true));
        assert_eq!(run.color.as_deref(), Some("FFFFFF"));

        let plain = reg.resolve_run(None, None, &RunProperties::default()).unwrap();
        assert_eq!(plain.size, Some(24));
    }

    #[test]
    fn memoized_view_matches_registry() {
        let reg = registry();
        let mut view = ResolvedStyles::new(&reg);
        let first = view.resolve("Heading1").unwrap().clone();
        let second = view.resolve("Heading1").unwrap().clone();
        assert_eq!(first, second);
        assert_eq!(first, reg.resolve("Heading1").unwrap());
        assert!(view.paragraph(None).is_ok());
    }

    #[test]
    fn re_registering_replaces() {
        let reg = registry().with_style(Style::paragraph("Heading1", "Replaced"));
        assert_eq!(reg.get("Heading1").map(|s| s.name.as_str()), Some("Replaced"));
        assert_eq!(reg.styles().len(), 3);
    }
}
