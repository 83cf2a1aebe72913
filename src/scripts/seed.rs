use crate::entities::{MenuType, UserRole, user_entity as users};
use crate::models::*;
use crate::services::{CampaignService, MenuService, SettingsService};
use crate::utils::{hash_password, normalize_email, validate_password};
use anyhow::{Context, Result};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

/// Category (name, slug) pairs every fresh install starts with.
pub const SEED_CATEGORIES: &[(&str, &str)] = &[
    ("Pembangunan", "pembangunan"),
    ("Pendidikan", "pendidikan"),
    ("Sosial", "sosial"),
];

/// Quick-action tiles on the home page: (label, icon, color, href).
pub const SEED_MENU_ITEMS: &[(&str, &str, &str, &str)] = &[
    ("Donasi", "hand-coins", "#0f766e", "/campaigns"),
    ("Zakat", "calculator", "#b45309", "/zakat"),
    ("Jadwal Sholat", "clock", "#1d4ed8", "/prayer-times"),
    ("Al-Quran", "book", "#15803d", "/quran"),
    ("Berita", "newspaper", "#7c3aed", "/news"),
    ("Kegiatan", "calendar", "#be123c", "/events"),
];

pub const SAMPLE_CAMPAIGN_SLUG: &str = "renovasi-tempat-wudhu";

#[derive(Debug, Clone, Default)]
pub struct AdminSeed {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub categories: usize,
    pub menu_items: usize,
    pub settings: usize,
    pub campaigns: usize,
    pub admins: usize,
}

impl std::fmt::Display for SeedReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "added {} categories, {} menu items, {} settings, {} campaigns, {} admins",
            self.categories, self.menu_items, self.settings, self.campaigns, self.admins
        )
    }
}

/// Inserts baseline rows. Anything that already exists is left untouched, so
/// running it twice adds nothing the second time.
pub async fn seed(db: &DatabaseConnection, admin: Option<AdminSeed>) -> Result<SeedReport> {
    let campaign_service = CampaignService::new(db.clone());
    let menu_service = MenuService::new(db.clone());
    let settings_service = SettingsService::new(db.clone());
    let mut report = SeedReport::default();

    let existing_categories = campaign_service
        .list_categories()
        .await
        .context("listing categories")?;
    for (name, slug) in SEED_CATEGORIES {
        if existing_categories.iter().any(|c| c.slug == *slug) {
            continue;
        }
        campaign_service
            .create_category(CreateCategoryRequest {
                name: name.to_string(),
                slug: Some(slug.to_string()),
            })
            .await
            .with_context(|| format!("creating category {slug}"))?;
        report.categories += 1;
    }

    let existing_menu = menu_service.list_all().await.context("listing menu items")?;
    for (position, (label, icon, color, href)) in SEED_MENU_ITEMS.iter().enumerate() {
        if existing_menu.iter().any(|m| m.href == *href) {
            continue;
        }
        menu_service
            .create(CreateMenuItemRequest {
                label: label.to_string(),
                icon: Some(icon.to_string()),
                color: Some(color.to_string()),
                href: Some(href.to_string()),
                order: Some(position as i32),
                is_active: Some(true),
                menu_type: Some(MenuType::Link),
                slug: None,
                template: None,
                content: None,
            })
            .await
            .with_context(|| format!("creating menu item {href}"))?;
        report.menu_items += 1;
    }

    report.settings = settings_service
        .seed_defaults()
        .await
        .context("writing default settings")?;

    let campaigns = campaign_service.list_all().await.context("listing campaigns")?;
    if !campaigns.iter().any(|c| c.slug == SAMPLE_CAMPAIGN_SLUG) {
        let categories = campaign_service.list_categories().await?;
        let category = categories
            .iter()
            .find(|c| c.slug == "pembangunan")
            .or(categories.first())
            .context("no category to attach the sample campaign to")?;
        campaign_service
            .create(CreateCampaignRequest {
                title: "Renovasi Tempat Wudhu".to_string(),
                slug: Some(SAMPLE_CAMPAIGN_SLUG.to_string()),
                description: "Perbaikan saluran air dan lantai tempat wudhu jamaah.".to_string(),
                image_url: None,
                target_amount: 50_000_000.0,
                end_date: None,
                category_id: category.id,
                is_active: Some(true),
            })
            .await
            .context("creating sample campaign")?;
        report.campaigns += 1;
    }

    if let Some(admin) = admin {
        if seed_admin(db, &admin).await? {
            report.admins += 1;
        }
    } else {
        log::warn!("No admin credentials given, skipping admin user");
    }

    log::info!("Seed finished: {report}");
    Ok(report)
}

/// Creates a verified admin account unless the email is already taken.
async fn seed_admin(db: &DatabaseConnection, admin: &AdminSeed) -> Result<bool> {
    let email = normalize_email(&admin.email)?;
    let existing = users::Entity::find()
        .filter(users::Column::Email.eq(email.as_str()))
        .one(db)
        .await?;
    if existing.is_some() {
        log::info!("Admin {email} already exists");
        return Ok(false);
    }

    validate_password(&admin.password)?;
    let now = Utc::now();
    users::ActiveModel {
        name: Set(admin.name.clone()),
        email: Set(email.clone()),
        password: Set(Some(hash_password(&admin.password)?)),
        role: Set(UserRole::Admin),
        is_verified: Set(true),
        verification_code: Set(None),
        verification_expires_at: Set(None),
        verification_attempts: Set(0),
        is_contributor: Set(false),
        avatar_url: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .with_context(|| format!("creating admin {email}"))?;

    log::info!("Admin {email} created");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::icons::Icon;
    use std::collections::HashSet;

    #[test]
    fn test_seed_menu_hrefs_are_unique() {
        let hrefs: HashSet<_> = SEED_MENU_ITEMS.iter().map(|(_, _, _, href)| *href).collect();
        assert_eq!(hrefs.len(), SEED_MENU_ITEMS.len());
    }

    #[test]
    fn test_seed_menu_icons_are_known() {
        for (_, icon, _, _) in SEED_MENU_ITEMS {
            assert_ne!(Icon::from_name(icon), Icon::Circle, "unknown icon {icon}");
        }
    }

    #[test]
    fn test_seed_category_slugs_are_normalized() {
        for (name, slug) in SEED_CATEGORIES {
            assert_eq!(crate::utils::slugify(name), *slug);
        }
    }

    #[test]
    fn test_report_display() {
        let report = SeedReport {
            categories: 3,
            menu_items: 6,
            settings: 7,
            campaigns: 1,
            admins: 0,
        };
        assert_eq!(
            report.to_string(),
            "added 3 categories, 6 menu items, 7 settings, 1 campaigns, 0 admins"
        );
    }
}
