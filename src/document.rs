use std::collections::HashMap;
use std::path::Path;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::background::DEFAULT_OVERLAY_OPACITY;
use crate::validate::ValidationRule;

/// Menu item ids derive their section by convention when no explicit
/// `href` is given: `menu-item-<section-id>`.
const MENU_ITEM_PREFIX: &str = "menu-item-";

/// The page document: the declarative description of sections, menu
/// items and forms that the engine operates on. Parsed once at startup;
/// sections are never created or destroyed afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageDocument {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_background: Option<String>,
    #[serde(default = "default_true")]
    pub overlay_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlay_opacity: Option<f64>,
    pub sections: Vec<SectionDecl>,
    #[serde(default)]
    pub menu_items: Vec<MenuItemDecl>,
    #[serde(default)]
    pub forms: Vec<FormDecl>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionDecl {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_background: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItemDecl {
    pub id: String,
    /// Whether clicking the item triggers an in-page scroll. Items
    /// without it act as normal links.
    #[serde(default)]
    pub scroll: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormDecl {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub captcha: bool,
    pub fields: Vec<FieldDecl>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDecl {
    pub name: String,
    /// Validation rule name: `none`, `non-empty`, `string`, `email`,
    /// `phone`. Missing means no validation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,
    #[serde(default)]
    pub required: bool,
}

pub fn load(path: &Path) -> anyhow::Result<PageDocument> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("read page document: {}", path.display()))?;
    let doc: PageDocument = serde_json::from_str(&raw)
        .with_context(|| format!("parse page document: {}", path.display()))?;
    Ok(doc)
}

#[derive(Debug, Clone)]
pub struct Section {
    pub id: String,
    pub custom_background: Option<String>,
}

#[derive(Debug, Clone)]
pub struct MenuItem {
    pub id: String,
    pub scroll: bool,
    pub href: Option<String>,
}

/// The resolved page model. The section ↔ menu item association is built
/// exactly once here, from the explicit `href` or the
/// `menu-item-<section-id>` naming convention, and never recomputed
/// during activation.
#[derive(Debug, Clone)]
pub struct PageModel {
    sections: Vec<Section>,
    menu_items: Vec<MenuItem>,
    default_background: Option<String>,
    overlay_opacity: Option<f64>,
    section_to_menu: HashMap<String, String>,
    menu_to_section: HashMap<String, String>,
}

impl PageModel {
    pub fn from_document(doc: &PageDocument) -> anyhow::Result<Self> {
        let sections: Vec<Section> = doc
            .sections
            .iter()
            .map(|decl| Section {
                id: decl.id.clone(),
                custom_background: decl.custom_background.clone(),
            })
            .collect();

        let menu_items: Vec<MenuItem> = doc
            .menu_items
            .iter()
            .map(|decl| MenuItem {
                id: decl.id.clone(),
                scroll: decl.scroll,
                href: decl.href.clone(),
            })
            .collect();

        let mut section_to_menu = HashMap::new();
        let mut menu_to_section = HashMap::new();
        for item in menu_items.iter().filter(|item| item.scroll) {
            let Some(target) = menu_item_target(item) else {
                continue;
            };
            if !sections.iter().any(|section| section.id == target) {
                anyhow::bail!(
                    "menu item {} targets unknown section: {target}",
                    item.id
                );
            }
            section_to_menu.insert(target.clone(), item.id.clone());
            menu_to_section.insert(item.id.clone(), target);
        }

        let overlay_opacity = doc
            .overlay_enabled
            .then(|| doc.overlay_opacity.unwrap_or(DEFAULT_OVERLAY_OPACITY));

        Ok(Self {
            sections,
            menu_items,
            default_background: doc.default_background.clone(),
            overlay_opacity,
            section_to_menu,
            menu_to_section,
        })
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|section| section.id == id)
    }

    pub fn first_section(&self) -> Option<&Section> {
        self.sections.first()
    }

    pub fn menu_item(&self, id: &str) -> Option<&MenuItem> {
        self.menu_items.iter().find(|item| item.id == id)
    }

    pub fn menu_item_for_section(&self, section: &str) -> Option<&str> {
        self.section_to_menu.get(section).map(String::as_str)
    }

    pub fn section_for_menu_item(&self, menu_item: &str) -> Option<&str> {
        self.menu_to_section.get(menu_item).map(String::as_str)
    }

    pub fn default_background(&self) -> Option<&str> {
        self.default_background.as_deref()
    }

    pub fn overlay_opacity(&self) -> Option<f64> {
        self.overlay_opacity
    }
}

fn menu_item_target(item: &MenuItem) -> Option<String> {
    if let Some(href) = item.href.as_deref()
        && let Some(target) = href.strip_prefix('#')
        && !target.is_empty()
    {
        return Some(target.to_owned());
    }
    item.id
        .strip_prefix(MENU_ITEM_PREFIX)
        .filter(|suffix| !suffix.is_empty())
        .map(str::to_owned)
}

/// Structural checks for the `check` command. Returns human-readable
/// issues; an empty list means the document is usable.
pub fn lint(doc: &PageDocument) -> Vec<String> {
    let mut issues = Vec::new();

    let mut seen_sections = HashMap::new();
    for section in &doc.sections {
        if section.id.trim().is_empty() {
            issues.push("section with empty id".to_owned());
        }
        if seen_sections.insert(section.id.clone(), ()).is_some() {
            issues.push(format!("duplicate section id: {}", section.id));
        }
    }
    if doc.sections.is_empty() {
        issues.push("page declares no sections".to_owned());
    }

    let mut seen_menu = HashMap::new();
    for item in &doc.menu_items {
        if seen_menu.insert(item.id.clone(), ()).is_some() {
            issues.push(format!("duplicate menu item id: {}", item.id));
        }
        if !item.scroll {
            continue;
        }
        let model_item = MenuItem {
            id: item.id.clone(),
            scroll: item.scroll,
            href: item.href.clone(),
        };
        match menu_item_target(&model_item) {
            Some(target) if doc.sections.iter().any(|s| s.id == target) => {}
            Some(target) => issues.push(format!(
                "menu item {} targets unknown section: {target}",
                item.id
            )),
            None => issues.push(format!(
                "scroll menu item {} has no resolvable section target",
                item.id
            )),
        }
    }

    let mut seen_forms = HashMap::new();
    for form in &doc.forms {
        if seen_forms.insert(form.id.clone(), ()).is_some() {
            issues.push(format!("duplicate form id: {}", form.id));
        }
        if form.captcha && form.endpoint.is_none() {
            issues.push(format!(
                "form {} declares a captcha but no endpoint",
                form.id
            ));
        }
        for field in &form.fields {
            if let Some(rule) = field.rule.as_deref()
                && ValidationRule::parse(rule).is_err()
            {
                issues.push(format!(
                    "form {} field {} has unknown validation rule: {rule}",
                    form.id, field.name
                ));
            }
        }
    }

    if let Some(opacity) = doc.overlay_opacity
        && !(opacity > 0.0 && opacity <= 1.0)
    {
        issues.push(format!("overlay opacity out of range (0, 1]: {opacity}"));
    }

    issues
}
