use crate::entities::{
    campaign_entity as campaigns, category_entity as categories, event_entity as events,
    menu_item_entity as menu_items, news_entity as news, setting_entity as settings,
    transaction_entity as transactions, user_entity as users,
};
use anyhow::{Context, Result};
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait, QueryOrder};
use std::collections::BTreeMap;

#[derive(Debug, Default)]
pub struct Diagnosis {
    pub row_counts: Vec<(&'static str, u64)>,
    pub settings: Vec<(String, String)>,
    pub duplicate_hrefs: Vec<(String, usize)>,
}

impl Diagnosis {
    pub fn is_healthy(&self) -> bool {
        self.duplicate_hrefs.is_empty()
    }

    pub fn print(&self) {
        println!("Row counts:");
        for (table, count) in &self.row_counts {
            println!("  {table:<12} {count}");
        }
        println!("Settings:");
        if self.settings.is_empty() {
            println!("  (none stored, defaults in effect)");
        }
        for (key, value) in &self.settings {
            println!("  {key} = {value:?}");
        }
        if self.duplicate_hrefs.is_empty() {
            println!("Menu hrefs: no duplicates");
        } else {
            println!("Menu hrefs used more than once:");
            for (href, count) in &self.duplicate_hrefs {
                println!("  {href} x{count}");
            }
        }
    }
}

/// Hrefs that appear on more than one menu item, with how often they appear.
pub fn duplicate_hrefs<'a>(hrefs: impl IntoIterator<Item = &'a str>) -> Vec<(String, usize)> {
    let mut seen: BTreeMap<&str, usize> = BTreeMap::new();
    for href in hrefs {
        *seen.entry(href).or_default() += 1;
    }
    seen.into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(href, count)| (href.to_string(), count))
        .collect()
}

pub async fn diagnose(db: &DatabaseConnection) -> Result<Diagnosis> {
    db.ping().await.context("database did not answer")?;
    log::info!("Database connection ok");

    let row_counts = vec![
        ("users", users::Entity::find().count(db).await?),
        ("categories", categories::Entity::find().count(db).await?),
        ("campaigns", campaigns::Entity::find().count(db).await?),
        ("menu_items", menu_items::Entity::find().count(db).await?),
        ("news", news::Entity::find().count(db).await?),
        ("events", events::Entity::find().count(db).await?),
        ("settings", settings::Entity::find().count(db).await?),
        ("transactions", transactions::Entity::find().count(db).await?),
    ];

    let settings = settings::Entity::find()
        .order_by_asc(settings::Column::Key)
        .all(db)
        .await?
        .into_iter()
        .map(|s| (s.key, s.value))
        .collect();

    let menu = menu_items::Entity::find().all(db).await?;
    let duplicate_hrefs = duplicate_hrefs(menu.iter().map(|m| m.href.as_str()));

    Ok(Diagnosis {
        row_counts,
        settings,
        duplicate_hrefs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_hrefs() {
        let dups = duplicate_hrefs(["/zakat", "/quran", "/zakat", "/news", "/zakat", "/quran"]);
        assert_eq!(
            dups,
            vec![("/quran".to_string(), 2), ("/zakat".to_string(), 3)]
        );
    }

    #[test]
    fn test_no_duplicates_is_healthy() {
        let diagnosis = Diagnosis {
            duplicate_hrefs: duplicate_hrefs(["/a", "/b"]),
            ..Default::default()
        };
        assert!(diagnosis.is_healthy());
    }
}
