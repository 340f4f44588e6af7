// src/domain/filter.rs

use serde::{Deserialize, Serialize};

use crate::api::Id;

/// Facets selected on the search screen. Every field is independently optional
/// and unset fields are left out of the search body.
///
/// Prices stay as typed by the user; nothing checks `min_price <= max_price`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSelection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_ids: Option<Vec<Id>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bedrooms: Option<Vec<u8>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bathrooms: Option<Vec<u8>>,
}

/// A single named field together with its replacement value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterField {
    Category(Option<Id>),
    Locations(Vec<Id>),
    MinPrice(Option<String>),
    MaxPrice(Option<String>),
    Bedrooms(Vec<u8>),
    Bathrooms(Vec<u8>),
}

/// UI actions that mutate the selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterAction {
    Set(FilterField),
    ToggleCategory(Id),
    ToggleLocation(Id),
    ToggleBedroomCount(u8),
    ToggleBathroomCount(u8),
    Reset,
}

impl FilterSelection {
    /// Replace one field. An empty multi-select or blank price goes back to unset.
    pub fn set_field(&mut self, field: FilterField) {
        match field {
            FilterField::Category(id) => self.category_id = id,
            FilterField::Locations(ids) => self.location_ids = non_empty(ids),
            FilterField::MinPrice(p) => self.min_price = non_blank(p),
            FilterField::MaxPrice(p) => self.max_price = non_blank(p),
            FilterField::Bedrooms(counts) => self.bedrooms = non_empty(counts),
            FilterField::Bathrooms(counts) => self.bathrooms = non_empty(counts),
        }
    }

    /// Single-select: selecting the current category clears it.
    pub fn toggle_category(&mut self, id: Id) {
        let next = if self.category_id.as_ref() == Some(&id) {
            None
        } else {
            Some(id)
        };
        self.set_field(FilterField::Category(next));
    }

    pub fn toggle_location(&mut self, id: Id) {
        let next = toggled(self.location_ids.as_deref(), id);
        self.set_field(FilterField::Locations(next));
    }

    pub fn toggle_bedroom_count(&mut self, count: u8) {
        let next = toggled(self.bedrooms.as_deref(), count);
        self.set_field(FilterField::Bedrooms(next));
    }

    pub fn toggle_bathroom_count(&mut self, count: u8) {
        let next = toggled(self.bathrooms.as_deref(), count);
        self.set_field(FilterField::Bathrooms(next));
    }

    pub fn apply(&mut self, action: FilterAction) {
        match action {
            FilterAction::Set(field) => self.set_field(field),
            FilterAction::ToggleCategory(id) => self.toggle_category(id),
            FilterAction::ToggleLocation(id) => self.toggle_location(id),
            FilterAction::ToggleBedroomCount(n) => self.toggle_bedroom_count(n),
            FilterAction::ToggleBathroomCount(n) => self.toggle_bathroom_count(n),
            FilterAction::Reset => *self = FilterSelection::default(),
        }
    }

    /// Reducer form of [`FilterSelection::apply`].
    pub fn reduce(mut self, action: FilterAction) -> Self {
        self.apply(action);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == FilterSelection::default()
    }
}

fn toggled<T: PartialEq + Clone>(current: Option<&[T]>, value: T) -> Vec<T> {
    let mut items = current.map(<[T]>::to_vec).unwrap_or_default();
    match items.iter().position(|v| *v == value) {
        Some(pos) => {
            items.remove(pos);
        }
        None => items.push(value),
    }
    items
}

fn non_empty<T>(items: Vec<T>) -> Option<Vec<T>> {
    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
