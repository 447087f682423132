//! # Deck Renderer
//!
//! A searchable list of cards. Each card shows a title, a subtitle, an
//! optional status badge, and an optional image. There is no pagination
//! and no sorting; cards follow data order.
//!
//! Clicking a card navigates: the event carries the view's first
//! `navigate` action, or [`DeckView::default_navigate`] when the view
//! declares none.

use siatc_core::{
    display_string, ActionDef, ActionType, DeckConfig, EntityDefinition, Record, ViewDefinition,
    ViewType,
};

use crate::error::{ensure_view, ViewError};
use crate::event::ViewEvent;
use crate::search::filter_indices;

/// Image slot of a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardImage {
    Url(String),
    /// `imageField` is configured but the record has no value.
    Placeholder,
}

/// One card.
#[derive(Debug, Clone, PartialEq)]
pub struct Card<'a> {
    pub item: &'a Record,
    pub title: String,
    pub subtitle: String,
    pub status: Option<String>,
    /// `None` when the view configures no `imageField`.
    pub image: Option<CardImage>,
}

/// View-model of a deck view.
#[derive(Debug, Clone)]
pub struct DeckView {
    view: ViewDefinition,
    entity: EntityDefinition,
    config: DeckConfig,
    data: Vec<Record>,
    query: String,
    visible: Vec<usize>,
}

impl DeckView {
    /// Build a deck over `data`.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::WrongViewType` if `view` is not a deck view and
    /// `ViewError::EntityMismatch` if it presents another entity.
    pub fn new(
        view: ViewDefinition,
        entity: EntityDefinition,
        data: Vec<Record>,
    ) -> Result<Self, ViewError> {
        ensure_view(&view, &entity, ViewType::Deck)?;
        let Some(config) = view.as_deck().cloned() else {
            return Err(ViewError::WrongViewType {
                view_id: view.id.clone(),
                expected: ViewType::Deck,
                found: view.view_type(),
            });
        };
        let visible = filter_indices(&data, "");
        Ok(Self {
            view,
            entity,
            config,
            data,
            query: String::new(),
            visible,
        })
    }

    pub fn view(&self) -> &ViewDefinition {
        &self.view
    }

    pub fn entity(&self) -> &EntityDefinition {
        &self.entity
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.visible = filter_indices(&self.data, &self.query);
    }

    pub fn set_data(&mut self, data: Vec<Record>) {
        self.data = data;
        self.visible = filter_indices(&self.data, &self.query);
    }

    pub fn len(&self) -> usize {
        self.visible.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }

    /// Cards for the records matching the current query.
    pub fn cards(&self) -> Vec<Card<'_>> {
        self.visible
            .iter()
            .map(|&i| self.card(&self.data[i]))
            .collect()
    }

    fn card<'a>(&self, item: &'a Record) -> Card<'a> {
        let text = |key: &str| item.get(key).map(display_string).unwrap_or_default();
        let image = self.config.image_field.as_deref().map(|key| {
            let url = text(key);
            if url.is_empty() {
                CardImage::Placeholder
            } else {
                CardImage::Url(url)
            }
        });
        Card {
            item,
            title: text(&self.config.title_field),
            subtitle: text(&self.config.subtitle_field),
            status: self.config.status_field.as_deref().map(text),
            image,
        }
    }

    /// Navigate action used when the view declares none.
    pub fn default_navigate() -> ActionDef {
        ActionDef::new("open", "ACTIONS.OPEN", "open", ActionType::Navigate)
    }

    /// Event for a card click.
    pub fn open(&self, item: &Record) -> ViewEvent {
        let action = self
            .view
            .first_action_of(ActionType::Navigate)
            .cloned()
            .unwrap_or_else(Self::default_navigate);
        ViewEvent::Action {
            action,
            item: Some(item.clone()),
        }
    }

    /// The floating `create` action, if the view has one.
    pub fn fab(&self) -> Option<&ActionDef> {
        self.view.first_action_of(ActionType::Create)
    }

    /// Event for a click on the floating action.
    pub fn trigger_fab(&self) -> Option<ViewEvent> {
        self.fab().map(|action| ViewEvent::Action {
            action: action.clone(),
            item: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use siatc_core::{FieldDef, FieldType};

    fn tickets() -> EntityDefinition {
        EntityDefinition {
            name: "tickets".into(),
            label: "Tickets".into(),
            id_field: "id".into(),
            label_field: "asunto".into(),
            fields: vec![
                FieldDef::new("id", "ID", FieldType::Number),
                FieldDef::new("asunto", "Asunto", FieldType::Text),
                FieldDef::new("fecha", "Fecha", FieldType::Date),
                FieldDef::new("estado", "Estado", FieldType::Enum).with_options(["ABIERTO"]),
                FieldDef::new("foto", "Foto", FieldType::Image),
            ],
        }
    }

    fn deck(image: bool, actions: serde_json::Value) -> ViewDefinition {
        let mut config = json!({ "titleField": "asunto", "subtitleField": "fecha", "statusField": "estado" });
        if image {
            config["imageField"] = json!("foto");
        }
        serde_json::from_value(json!({
            "id": "tickets-deck",
            "entity": "tickets",
            "type": "deck",
            "name": "Mis tickets",
            "config": config,
            "actions": actions,
            "roles": ["USUARIO"]
        }))
        .unwrap()
    }

    fn data() -> Vec<Record> {
        vec![
            json!({"id": 1, "asunto": "Impresora", "fecha": "2024-03-01", "estado": "ABIERTO", "foto": "https://x/1.jpg"}),
            json!({"id": 2, "asunto": "Monitor", "fecha": "2024-03-02", "estado": "ABIERTO"}),
            json!({"id": 3, "asunto": "VPN", "fecha": "2024-03-03", "estado": "CERRADO"}),
        ]
        .into_iter()
        .map(|v| v.as_object().cloned().unwrap())
        .collect()
    }

    #[test]
    fn test_cards_with_image_slots() {
        let d = DeckView::new(deck(true, json!([])), tickets(), data()).unwrap();
        let cards = d.cards();
        assert_eq!(cards.len(), 3);
        assert_eq!(cards[0].title, "Impresora");
        assert_eq!(cards[0].subtitle, "2024-03-01");
        assert_eq!(cards[0].status.as_deref(), Some("ABIERTO"));
        assert_eq!(cards[0].image, Some(CardImage::Url("https://x/1.jpg".into())));
        assert_eq!(cards[1].image, Some(CardImage::Placeholder));
    }

    #[test]
    fn test_no_image_field_means_no_slot() {
        let d = DeckView::new(deck(false, json!([])), tickets(), data()).unwrap();
        assert!(d.cards().iter().all(|c| c.image.is_none()));
    }

    #[test]
    fn test_search_single_match_any_case() {
        let mut d = DeckView::new(deck(true, json!([])), tickets(), data()).unwrap();
        for q in ["monitor", "MONITOR", "MoNiToR"] {
            d.set_query(q);
            let ids: Vec<_> = d.cards().iter().map(|c| c.item["id"].clone()).collect();
            assert_eq!(ids, vec![json!(2)]);
        }
        d.set_query("cerrado");
        assert_eq!(d.len(), 1);
        d.set_query("");
        assert_eq!(d.len(), 3);
    }

    #[test]
    fn test_open_uses_declared_navigate() {
        let d = DeckView::new(
            deck(
                true,
                json!([
                    { "id": "new", "label": "New", "type": "create" },
                    { "id": "detail", "label": "Detail", "type": "navigate" }
                ]),
            ),
            tickets(),
            data(),
        )
        .unwrap();
        let item = d.cards()[2].item.clone();
        let event = d.open(&item);
        assert_eq!(event.action().id, "detail");
        assert_eq!(event.item(), Some(&item));
        assert_eq!(d.fab().unwrap().id, "new");
        assert!(d.trigger_fab().unwrap().item().is_none());
    }

    #[test]
    fn test_open_falls_back_to_default_navigate() {
        let d = DeckView::new(deck(false, json!([])), tickets(), data()).unwrap();
        let event = d.open(&data()[0]);
        assert_eq!(event.action(), &DeckView::default_navigate());
        assert!(d.fab().is_none());
        assert!(d.trigger_fab().is_none());
    }

    #[test]
    fn test_table_view_is_rejected() {
        let table: ViewDefinition = serde_json::from_value(json!({
            "id": "tickets-table",
            "entity": "tickets",
            "type": "table",
            "name": "Tickets",
            "config": { "columns": ["asunto"] },
            "roles": ["ADMIN"]
        }))
        .unwrap();
        let err = DeckView::new(table, tickets(), data()).unwrap_err();
        assert!(matches!(
            err,
            ViewError::WrongViewType {
                expected: ViewType::Deck,
                found: ViewType::Table,
                ..
            }
        ));
    }

    #[test]
    fn test_set_data_keeps_query() {
        let mut d = DeckView::new(deck(false, json!([])), tickets(), vec![]).unwrap();
        assert!(d.is_empty());
        d.set_query("vpn");
        d.set_data(data());
        assert_eq!(d.len(), 1);
    }
}
