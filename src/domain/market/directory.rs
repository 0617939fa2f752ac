use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A tradable stock: display name plus ticker symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockListing {
    pub name: String,
    pub ticker: String,
}

impl StockListing {
    pub fn new(name: impl Into<String>, ticker: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ticker: ticker.into(),
        }
    }
}

/// Ordered set of listings.
///
/// On the wire this is a JSON object mapping company name to ticker. The
/// document order of that object is kept, so "first stock" means the same
/// thing it does upstream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StockDirectory {
    listings: Vec<StockListing>,
}

impl StockDirectory {
    pub fn new(listings: Vec<StockListing>) -> Self {
        Self { listings }
    }

    pub fn listings(&self) -> &[StockListing] {
        &self.listings
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    pub fn first(&self) -> Option<&StockListing> {
        self.listings.first()
    }

    pub fn tickers(&self) -> impl Iterator<Item = &str> {
        self.listings.iter().map(|l| l.ticker.as_str())
    }

    pub fn name_of(&self, ticker: &str) -> Option<&str> {
        self.listings
            .iter()
            .find(|l| l.ticker.eq_ignore_ascii_case(ticker))
            .map(|l| l.name.as_str())
    }

    /// The first `n` listings, in directory order.
    pub fn take(&self, n: usize) -> &[StockListing] {
        &self.listings[..n.min(self.listings.len())]
    }
}

impl FromIterator<(String, String)> for StockDirectory {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            listings: iter
                .into_iter()
                .map(|(name, ticker)| StockListing { name, ticker })
                .collect(),
        }
    }
}

impl Serialize for StockDirectory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.listings.len()))?;
        for listing in &self.listings {
            map.serialize_entry(&listing.name, &listing.ticker)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for StockDirectory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DirectoryVisitor;

        impl<'de> Visitor<'de> for DirectoryVisitor {
            type Value = StockDirectory;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of company name to ticker")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut listings = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((name, ticker)) = access.next_entry::<String, String>()? {
                    listings.push(StockListing { name, ticker });
                }
                Ok(StockDirectory { listings })
            }
        }

        deserializer.deserialize_map(DirectoryVisitor)
    }
}
