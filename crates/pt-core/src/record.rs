use std::collections::HashMap;

/// Colonnes « nom de produit » reconnues, dans l'ordre de repli.
///
/// # Example
/// ```
/// use pt_core::record::KnownColumn;
/// assert_eq!(KnownColumn::from_label("Product Name"), Some(KnownColumn::ProductNameLabel));
/// assert_eq!(KnownColumn::from_label("sku"), None);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KnownColumn {
    /// `product_name`
    ProductName,
    /// `Product Name`
    ProductNameLabel,
    /// `title`
    Title,
    /// `name`
    Name,
    /// `product title`
    ProductTitle,
}

impl KnownColumn {
    /// Ordre de repli utilisé par la résolution du nom affiché.
    pub const FALLBACK_ORDER: [Self; 5] = [
        Self::ProductName,
        Self::ProductNameLabel,
        Self::Title,
        Self::Name,
        Self::ProductTitle,
    ];

    /// Header label, exact and case-sensitive.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::ProductName => "product_name",
            Self::ProductNameLabel => "Product Name",
            Self::Title => "title",
            Self::Name => "name",
            Self::ProductTitle => "product title",
        }
    }

    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::FALLBACK_ORDER
            .into_iter()
            .find(|col| col.label() == label)
    }
}

/// Une colonne du jeu de données : connue (champ nommé) ou libre.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Column {
    /// Name-like column stored in [`NameFields`].
    Known(KnownColumn),
    /// Any other column, stored in the side map.
    Other(String),
}

impl Column {
    #[must_use]
    pub fn parse(label: &str) -> Self {
        KnownColumn::from_label(label).map_or_else(|| Self::Other(label.to_owned()), Self::Known)
    }

    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Known(known) => known.label(),
            Self::Other(label) => label,
        }
    }
}

/// Valeurs des colonnes de nom reconnues. `None` = colonne absente ou cellule manquante.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NameFields {
    pub product_name: Option<String>,
    pub product_name_label: Option<String>,
    pub title: Option<String>,
    pub name: Option<String>,
    pub product_title: Option<String>,
}

impl NameFields {
    #[must_use]
    pub fn get(&self, column: KnownColumn) -> Option<&str> {
        match column {
            KnownColumn::ProductName => self.product_name.as_deref(),
            KnownColumn::ProductNameLabel => self.product_name_label.as_deref(),
            KnownColumn::Title => self.title.as_deref(),
            KnownColumn::Name => self.name.as_deref(),
            KnownColumn::ProductTitle => self.product_title.as_deref(),
        }
    }

    fn slot_mut(&mut self, column: KnownColumn) -> &mut Option<String> {
        match column {
            KnownColumn::ProductName => &mut self.product_name,
            KnownColumn::ProductNameLabel => &mut self.product_name_label,
            KnownColumn::Title => &mut self.title,
            KnownColumn::Name => &mut self.name,
            KnownColumn::ProductTitle => &mut self.product_title,
        }
    }
}

/// Une ligne du jeu de données produit.
///
/// Les colonnes de nom connues sont des champs typés ; les autres vont dans
/// une table annexe. `order` conserve l'ordre d'en-tête pour la réécriture.
///
/// # Example
/// ```
/// use pt_core::record::ProductRecord;
/// let mut rec = ProductRecord::default();
/// rec.set("sku", "A-1");
/// rec.set("title", "Blue Mug");
/// rec.set("image", "images/Blue_Mug.png");
/// assert_eq!(rec.names.title.as_deref(), Some("Blue Mug"));
/// assert_eq!(rec.columns().collect::<Vec<_>>(), ["sku", "title", "image"]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProductRecord {
    /// Typed name-like columns.
    pub names: NameFields,
    others: HashMap<String, String>,
    order: Vec<Column>,
}

impl ProductRecord {
    /// Déclare une colonne sans valeur (cellule manquante d'une ligne courte).
    pub fn declare(&mut self, label: &str) {
        let column = Column::parse(label);
        if !self.order.contains(&column) {
            self.order.push(column);
        }
    }

    /// Écrit une valeur ; la colonne est ajoutée en fin d'ordre si nouvelle.
    pub fn set(&mut self, label: &str, value: impl Into<String>) {
        let column = Column::parse(label);
        let value = value.into();
        match &column {
            Column::Known(known) => *self.names.slot_mut(*known) = Some(value),
            Column::Other(name) => {
                self.others.insert(name.clone(), value);
            }
        }
        if !self.order.contains(&column) {
            self.order.push(column);
        }
    }

    #[must_use]
    pub fn get(&self, label: &str) -> Option<&str> {
        match KnownColumn::from_label(label) {
            Some(known) => self.names.get(known),
            None => self.others.get(label).map(String::as_str),
        }
    }

    /// Column labels in header order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(Column::label)
    }
}
