//! # Workspace State
//!
//! The full persisted workspace and every mutation it supports. This is the
//! single aggregate the store crate serializes; all mutations are pure
//! in-memory edits so persistence stays a caller concern.
//!
//! ## State Layout
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                        WorkspaceState                            │
//! │                                                                  │
//! │  products            current working set                         │
//! │  assumptions         global cost assumptions                     │
//! │  custom_markups      user-defined markups (merged over built-ins)│
//! │  retail_currencies   currencies to project retail prices in      │
//! │  favorites           pinned products, deduped by name + price    │
//! │  templates           reusable product sets                       │
//! │  history             landed-cost snapshots, newest first, capped │
//! │  comparisons         saved what-if scenarios                     │
//! └──────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::currency::Currency;
use crate::error::{CoreError, CoreResult};
use crate::markup::{custom_markup, markup_id, merge_markups};
use crate::types::{
    new_comparison_id, new_template_id, sample_products, ComparisonScenario, CostAssumptions,
    HistoryEntry, MarkupScenario, Product, Template, HISTORY_LIMIT,
};

/// Retail currencies offered when none are configured.
pub const DEFAULT_RETAIL_CURRENCIES: [Currency; 1] = [Currency::INR];

/// How a template's products land in the workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplyMode {
    /// Discard the current products and take the template's.
    Replace,
    /// Append the template's products after the current ones.
    Merge,
}

/// The complete persisted workspace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceState {
    pub products: Vec<Product>,
    pub assumptions: CostAssumptions,
    #[serde(default)]
    pub custom_markups: Vec<MarkupScenario>,
    #[serde(default)]
    pub retail_currencies: Vec<Currency>,
    #[serde(default)]
    pub favorites: Vec<Product>,
    #[serde(default)]
    pub templates: Vec<Template>,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
    #[serde(default)]
    pub comparisons: Vec<ComparisonScenario>,
}

impl Default for WorkspaceState {
    /// A fresh workspace: sample products, default assumptions, INR + USD
    /// retail projection.
    fn default() -> Self {
        WorkspaceState {
            products: sample_products(),
            assumptions: CostAssumptions::default(),
            custom_markups: Vec::new(),
            retail_currencies: DEFAULT_RETAIL_CURRENCIES.to_vec(),
            favorites: Vec::new(),
            templates: Vec::new(),
            history: Vec::new(),
            comparisons: Vec::new(),
        }
    }
}

impl WorkspaceState {
    // =========================================================================
    // Products
    // =========================================================================

    /// Appends a product and stamps its update time, returning its id.
    pub fn add_product(&mut self, mut product: Product) -> String {
        product.last_updated = Some(Utc::now());
        let id = product.id.clone();
        self.products.push(product);
        id
    }

    /// Appends a batch of products (bulk import).
    pub fn add_products_bulk(&mut self, products: Vec<Product>) {
        let now = Utc::now();
        for mut product in products {
            product.last_updated = Some(now);
            self.products.push(product);
        }
    }

    /// Edits a product in place through a closure.
    pub fn update_product(
        &mut self,
        id: &str,
        edit: impl FnOnce(&mut Product),
    ) -> CoreResult<&Product> {
        let product = self
            .products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| CoreError::ProductNotFound(id.to_string()))?;
        edit(product);
        product.last_updated = Some(Utc::now());
        Ok(product)
    }

    /// Removes a product by id.
    pub fn remove_product(&mut self, id: &str) -> CoreResult<Product> {
        let index = self
            .products
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| CoreError::ProductNotFound(id.to_string()))?;
        Ok(self.products.remove(index))
    }

    /// Duplicates a product under a fresh id with a "(Copy)" suffix,
    /// returning the new id.
    pub fn duplicate_product(&mut self, id: &str) -> CoreResult<String> {
        let source = self
            .products
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| CoreError::ProductNotFound(id.to_string()))?;
        let mut copy = source.clone();
        copy.id = crate::types::new_product_id();
        copy.name = format!("{} (Copy)", copy.name);
        copy.last_updated = Some(Utc::now());
        let new_id = copy.id.clone();
        self.products.push(copy);
        Ok(new_id)
    }

    /// Removes every product.
    pub fn clear_products(&mut self) {
        self.products.clear();
    }

    // =========================================================================
    // Assumptions
    // =========================================================================

    /// Replaces the cost assumptions wholesale.
    pub fn set_assumptions(&mut self, assumptions: CostAssumptions) {
        self.assumptions = assumptions;
    }

    /// Resets assumptions to defaults, keeping the chosen base currency.
    pub fn reset_assumptions(&mut self) {
        let base = self.assumptions.base_currency;
        self.assumptions = CostAssumptions {
            base_currency: base,
            ..CostAssumptions::default()
        };
    }

    /// Changes the base currency, making sure it is also projected at
    /// retail so cost and price stay comparable on screen.
    pub fn set_base_currency(&mut self, currency: Currency) {
        self.assumptions.base_currency = currency;
        if currency.is_retail() && !self.retail_currencies.contains(&currency) {
            self.retail_currencies.push(currency);
        }
    }

    // =========================================================================
    // Retail Currencies
    // =========================================================================

    /// Replaces the retail currency list, dropping non-retail entries.
    /// An empty result falls back to the defaults.
    pub fn set_retail_currencies(&mut self, currencies: &[Currency]) {
        let mut filtered: Vec<Currency> = Vec::new();
        for &currency in currencies {
            if currency.is_retail() && !filtered.contains(&currency) {
                filtered.push(currency);
            }
        }
        self.retail_currencies = if filtered.is_empty() {
            DEFAULT_RETAIL_CURRENCIES.to_vec()
        } else {
            filtered
        };
    }

    /// Adds one retail currency.
    pub fn add_retail_currency(&mut self, currency: Currency) -> CoreResult<()> {
        if !currency.is_retail() {
            return Err(CoreError::NotARetailCurrency(currency));
        }
        if !self.retail_currencies.contains(&currency) {
            self.retail_currencies.push(currency);
        }
        Ok(())
    }

    /// Removes one retail currency; an emptied list falls back to defaults.
    pub fn remove_retail_currency(&mut self, currency: Currency) {
        self.retail_currencies.retain(|&c| c != currency);
        if self.retail_currencies.is_empty() {
            self.retail_currencies = DEFAULT_RETAIL_CURRENCIES.to_vec();
        }
    }

    // =========================================================================
    // Markups
    // =========================================================================

    /// Adds or replaces a custom markup for a percentage.
    pub fn upsert_custom_markup(&mut self, percentage: f64) -> MarkupScenario {
        let scenario = custom_markup(percentage);
        self.custom_markups.retain(|m| m.id != scenario.id);
        self.custom_markups.push(scenario.clone());
        scenario
    }

    /// Removes a custom markup by percentage.
    pub fn remove_custom_markup(&mut self, percentage: f64) {
        let id = markup_id(percentage);
        self.custom_markups.retain(|m| m.id != id);
    }

    /// Drops every custom markup.
    pub fn reset_custom_markups(&mut self) {
        self.custom_markups.clear();
    }

    /// The effective markup list: built-ins merged with customs, sorted.
    pub fn effective_markups(&self) -> Vec<MarkupScenario> {
        merge_markups(&self.custom_markups)
    }

    // =========================================================================
    // Favorites
    // =========================================================================

    /// Pins a product to favorites; a favorite with the same name and unit
    /// price already present wins.
    pub fn add_favorite(&mut self, product: Product) {
        let duplicate = self
            .favorites
            .iter()
            .any(|f| f.name == product.name && f.unit_price == product.unit_price);
        if !duplicate {
            self.favorites.push(product);
        }
    }

    /// Removes a favorite by id.
    pub fn remove_favorite(&mut self, id: &str) -> CoreResult<()> {
        let before = self.favorites.len();
        self.favorites.retain(|f| f.id != id);
        if self.favorites.len() == before {
            return Err(CoreError::FavoriteNotFound(id.to_string()));
        }
        Ok(())
    }

    /// Copies a favorite back into the product list under a fresh id,
    /// returning the new id.
    pub fn recall_favorite(&mut self, id: &str) -> CoreResult<String> {
        let source = self
            .favorites
            .iter()
            .find(|f| f.id == id)
            .ok_or_else(|| CoreError::FavoriteNotFound(id.to_string()))?;
        let mut product = source.clone();
        product.id = crate::types::new_product_id();
        product.last_updated = Some(Utc::now());
        let new_id = product.id.clone();
        self.products.push(product);
        Ok(new_id)
    }

    // =========================================================================
    // Templates
    // =========================================================================

    /// Saves the current products, assumptions and custom markups as a
    /// named template.
    pub fn save_template(
        &mut self,
        name: impl Into<String>,
        description: Option<String>,
    ) -> String {
        let now = Utc::now();
        let template = Template {
            id: new_template_id(),
            name: name.into(),
            description,
            products: self.products.clone(),
            assumptions: self.assumptions.clone(),
            markups: self.custom_markups.clone(),
            created_at: now,
            updated_at: now,
        };
        let id = template.id.clone();
        self.templates.push(template);
        id
    }

    /// Renames or re-describes a template.
    pub fn update_template(
        &mut self,
        id: &str,
        name: Option<String>,
        description: Option<String>,
    ) -> CoreResult<&Template> {
        let template = self
            .templates
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| CoreError::TemplateNotFound(id.to_string()))?;
        if let Some(name) = name {
            template.name = name;
        }
        if let Some(description) = description {
            template.description = Some(description);
        }
        template.updated_at = Utc::now();
        Ok(template)
    }

    /// Deletes a template by id.
    pub fn delete_template(&mut self, id: &str) -> CoreResult<()> {
        let before = self.templates.len();
        self.templates.retain(|t| t.id != id);
        if self.templates.len() == before {
            return Err(CoreError::TemplateNotFound(id.to_string()));
        }
        Ok(())
    }

    /// Applies a template's contents to the workspace.
    ///
    /// The template's assumptions and custom markups take over in both
    /// modes; only the product list differs, with `Replace` swapping it
    /// out and `Merge` appending. Applied products get fresh ids so later
    /// edits never touch the template.
    pub fn apply_template(&mut self, id: &str, mode: ApplyMode) -> CoreResult<()> {
        let template = self
            .templates
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| CoreError::TemplateNotFound(id.to_string()))?
            .clone();

        let mut incoming: Vec<Product> = template.products;
        let now = Utc::now();
        for product in &mut incoming {
            product.id = crate::types::new_product_id();
            product.last_updated = Some(now);
        }

        match mode {
            ApplyMode::Replace => self.products = incoming,
            ApplyMode::Merge => self.products.extend(incoming),
        }
        self.assumptions = template.assumptions;
        self.custom_markups = template.markups;
        Ok(())
    }

    // =========================================================================
    // History
    // =========================================================================

    /// Prepends a history entry, trimming the list to [`HISTORY_LIMIT`].
    pub fn record_history(&mut self, entry: HistoryEntry) {
        self.history.insert(0, entry);
        self.history.truncate(HISTORY_LIMIT);
    }

    /// Drops every history entry.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    // =========================================================================
    // Comparisons
    // =========================================================================

    /// Saves the current products and assumptions as a comparison scenario.
    pub fn create_comparison(
        &mut self,
        name: impl Into<String>,
        description: Option<String>,
    ) -> String {
        let scenario = ComparisonScenario {
            id: new_comparison_id(),
            name: name.into(),
            description,
            products: self.products.clone(),
            assumptions: self.assumptions.clone(),
            notes: None,
            created_at: Utc::now(),
        };
        let id = scenario.id.clone();
        self.comparisons.push(scenario);
        id
    }

    /// Renames or annotates a comparison scenario.
    pub fn update_comparison(
        &mut self,
        id: &str,
        name: Option<String>,
        notes: Option<String>,
    ) -> CoreResult<&ComparisonScenario> {
        let scenario = self
            .comparisons
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| CoreError::ComparisonNotFound(id.to_string()))?;
        if let Some(name) = name {
            scenario.name = name;
        }
        if let Some(notes) = notes {
            scenario.notes = Some(notes);
        }
        Ok(scenario)
    }

    /// Deletes a comparison scenario by id.
    pub fn delete_comparison(&mut self, id: &str) -> CoreResult<()> {
        let before = self.comparisons.len();
        self.comparisons.retain(|c| c.id != id);
        if self.comparisons.len() == before {
            return Err(CoreError::ComparisonNotFound(id.to_string()));
        }
        Ok(())
    }

    /// Restores a comparison's products and assumptions into the workspace.
    pub fn apply_comparison(&mut self, id: &str) -> CoreResult<()> {
        let scenario = self
            .comparisons
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| CoreError::ComparisonNotFound(id.to_string()))?
            .clone();
        self.products = scenario.products;
        self.assumptions = scenario.assumptions;
        Ok(())
    }

    // =========================================================================
    // Reset
    // =========================================================================

    /// Returns the workspace to its freshly-seeded default.
    pub fn reset_all(&mut self) {
        *self = WorkspaceState::default();
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
