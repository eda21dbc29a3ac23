use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

#[derive(Clone, Debug, Serialize)]
pub struct Country {
    pub id: String,
    pub name: String,
    pub region: String,
    pub flag: String,
}

pub struct Countries {
    by_id: HashMap<String, Country>,
    tree: BTreeMap<String, Vec<Country>>,
}

impl Countries {
    /// Parses `{ region: { code: name } }`.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let regions: BTreeMap<String, BTreeMap<String, String>> = serde_json::from_str(raw)?;

        let mut by_id = HashMap::new();
        let mut tree = BTreeMap::new();
        for (region, countries) in regions {
            let mut list: Vec<Country> = countries
                .into_iter()
                .map(|(id, name)| Country {
                    flag: flag_emoji(&id),
                    id,
                    name,
                    region: region.clone(),
                })
                .collect();
            list.sort_by(|a, b| a.name.cmp(&b.name));

            for country in &list {
                by_id.insert(country.id.clone(), country.clone());
            }
            tree.insert(region, list);
        }

        Ok(Self { by_id, tree })
    }

    pub fn by_id(&self, id: &str) -> Option<&Country> {
        self.by_id.get(id)
    }

    /// Countries grouped by region, each group sorted by name.
    pub fn tree(&self) -> &BTreeMap<String, Vec<Country>> {
        &self.tree
    }
}

fn flag_emoji(code: &str) -> String {
    code.chars()
        .filter(|c| c.is_ascii_uppercase())
        .filter_map(|c| char::from_u32(0x1F1E6 + (c as u32 - 'A' as u32)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "Europe": { "GB": "United Kingdom", "AT": "Austria" },
        "Oceania": { "NZ": "New Zealand" }
    }"#;

    #[test]
    fn lookup_by_code() {
        let countries = Countries::from_json(SAMPLE).unwrap();
        assert_eq!(countries.by_id("NZ").map(|c| c.name.as_str()), Some("New Zealand"));
        assert_eq!(countries.by_id("NZ").map(|c| c.region.as_str()), Some("Oceania"));
        assert!(countries.by_id("nz").is_none());
        assert!(countries.by_id("").is_none());
    }

    #[test]
    fn tree_sorts_by_name_within_region() {
        let countries = Countries::from_json(SAMPLE).unwrap();
        let europe: Vec<&str> = countries.tree()["Europe"].iter().map(|c| c.id.as_str()).collect();
        assert_eq!(europe, vec!["AT", "GB"]);
        assert_eq!(countries.tree().keys().collect::<Vec<_>>(), vec!["Europe", "Oceania"]);
    }

    #[test]
    fn flag_from_code() {
        assert_eq!(flag_emoji("GB"), "\u{1F1EC}\u{1F1E7}");
    }

    #[test]
    fn bundled_list_parses() {
        let countries = Countries::from_json(include_str!("../../data/countries.json")).unwrap();
        assert!(countries.by_id("US").is_some());
        assert!(countries.by_id("ZZ").is_none());
    }
}
