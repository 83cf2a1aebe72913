use maud::{Markup, html};

/// Icons an admin can pick for a menu item. Unknown names render as [`Icon::Circle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    Mosque,
    HandCoins,
    Heart,
    Calculator,
    Clock,
    Book,
    Newspaper,
    Calendar,
    Users,
    Phone,
    MapPin,
    Share,
    Link,
    Home,
    Circle,
}

impl Icon {
    pub const ALL: &'static [Icon] = &[
        Icon::Mosque,
        Icon::HandCoins,
        Icon::Heart,
        Icon::Calculator,
        Icon::Clock,
        Icon::Book,
        Icon::Newspaper,
        Icon::Calendar,
        Icon::Users,
        Icon::Phone,
        Icon::MapPin,
        Icon::Share,
        Icon::Link,
        Icon::Home,
        Icon::Circle,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Icon::Mosque => "mosque",
            Icon::HandCoins => "hand-coins",
            Icon::Heart => "heart",
            Icon::Calculator => "calculator",
            Icon::Clock => "clock",
            Icon::Book => "book",
            Icon::Newspaper => "newspaper",
            Icon::Calendar => "calendar",
            Icon::Users => "users",
            Icon::Phone => "phone",
            Icon::MapPin => "map-pin",
            Icon::Share => "share",
            Icon::Link => "link",
            Icon::Home => "home",
            Icon::Circle => "circle",
        }
    }

    /// Case-insensitive; accepts `_` for `-` and a few common aliases.
    pub fn from_name(name: &str) -> Icon {
        let normalized = name.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "masjid" => return Icon::Mosque,
            "donation" | "donasi" | "infaq" | "zakat" => return Icon::HandCoins,
            "quran" | "al-quran" | "book-open" => return Icon::Book,
            "news" | "berita" => return Icon::Newspaper,
            "event" | "events" | "kajian" => return Icon::Calendar,
            "prayer" | "sholat" => return Icon::Clock,
            _ => {}
        }
        Icon::ALL
            .iter()
            .copied()
            .find(|icon| icon.name() == normalized)
            .unwrap_or(Icon::Circle)
    }

    fn path_data(&self) -> &'static str {
        match self {
            Icon::Mosque => "M12 2c-2 2-4 3.5-4 6h8c0-2.5-2-4-4-6zM4 10h16v2H4zM5 12v9h4v-4a3 3 0 0 1 6 0v4h4v-9",
            Icon::HandCoins => "M11 15h2a2 2 0 1 0 0-4h-3c-.6 0-1.1.2-1.4.6L3 17M7 21l1.6-1.4c.3-.4.8-.6 1.4-.6h4c1.1 0 2.1-.4 2.8-1.2l4.6-4.4a2 2 0 0 0-2.75-2.91l-4.2 3.9M2 16l6 6M16 9.1a3 3 0 1 0 0-6 3 3 0 0 0 0 6z",
            Icon::Heart => "M19 14c1.5-1.5 3-3.2 3-5.5A5.5 5.5 0 0 0 16.5 3c-1.8 0-3 .5-4.5 2-1.5-1.5-2.7-2-4.5-2A5.5 5.5 0 0 0 2 8.5c0 2.3 1.5 4 3 5.5l7 7z",
            Icon::Calculator => "M6 2h12a2 2 0 0 1 2 2v16a2 2 0 0 1-2 2H6a2 2 0 0 1-2-2V4a2 2 0 0 1 2-2zM8 6h8M8 11h.01M12 11h.01M16 11h.01M8 15h.01M12 15h.01M16 15h.01M8 19h8",
            Icon::Clock => "M12 22a10 10 0 1 0 0-20 10 10 0 0 0 0 20zM12 6v6l4 2",
            Icon::Book => "M2 3h6a4 4 0 0 1 4 4v14a3 3 0 0 0-3-3H2zM22 3h-6a4 4 0 0 0-4 4v14a3 3 0 0 1 3-3h7z",
            Icon::Newspaper => "M4 22h16a2 2 0 0 0 2-2V4a2 2 0 0 0-2-2H8a2 2 0 0 0-2 2v16a2 2 0 0 1-2 2zm0 0a2 2 0 0 1-2-2v-9c0-1.1.9-2 2-2h2M18 14h-8M15 18h-5M10 6h8v4h-8z",
            Icon::Calendar => "M5 4h14a2 2 0 0 1 2 2v14a2 2 0 0 1-2 2H5a2 2 0 0 1-2-2V6a2 2 0 0 1 2-2zM16 2v4M8 2v4M3 10h18",
            Icon::Users => "M16 21v-2a4 4 0 0 0-4-4H6a4 4 0 0 0-4 4v2M9 11a4 4 0 1 0 0-8 4 4 0 0 0 0 8zM22 21v-2a4 4 0 0 0-3-3.87M16 3.13a4 4 0 0 1 0 7.75",
            Icon::Phone => "M22 16.92v3a2 2 0 0 1-2.18 2 19.8 19.8 0 0 1-8.63-3.07 19.5 19.5 0 0 1-6-6A19.8 19.8 0 0 1 2.12 4.18 2 2 0 0 1 4.11 2h3a2 2 0 0 1 2 1.72c.13.96.36 1.9.7 2.81a2 2 0 0 1-.45 2.11L8.09 9.91a16 16 0 0 0 6 6l1.27-1.27a2 2 0 0 1 2.11-.45c.9.34 1.85.57 2.81.7A2 2 0 0 1 22 16.92z",
            Icon::MapPin => "M20 10c0 6-8 12-8 12s-8-6-8-12a8 8 0 0 1 16 0zM12 13a3 3 0 1 0 0-6 3 3 0 0 0 0 6z",
            Icon::Share => "M18 8a3 3 0 1 0 0-6 3 3 0 0 0 0 6zM6 15a3 3 0 1 0 0-6 3 3 0 0 0 0 6zM18 22a3 3 0 1 0 0-6 3 3 0 0 0 0 6zM8.6 13.5l6.8 4M15.4 6.5l-6.8 4",
            Icon::Link => "M10 13a5 5 0 0 0 7.54.54l3-3a5 5 0 0 0-7.07-7.07l-1.72 1.71M14 11a5 5 0 0 0-7.54-.54l-3 3a5 5 0 0 0 7.07 7.07l1.71-1.71",
            Icon::Home => "M3 9l9-7 9 7v11a2 2 0 0 1-2 2H5a2 2 0 0 1-2-2zM9 22V12h6v10",
            Icon::Circle => "M12 22a10 10 0 1 0 0-20 10 10 0 0 0 0 20z",
        }
    }

    pub fn render(&self) -> Markup {
        html! {
            svg.icon xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" width="24" height="24"
                fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round"
                stroke-linejoin="round" aria-hidden="true" data-icon=(self.name()) {
                path d=(self.path_data()) {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_roundtrips_every_icon() {
        for icon in Icon::ALL {
            assert_eq!(Icon::from_name(icon.name()), *icon);
        }
    }

    #[test]
    fn test_unknown_name_falls_back() {
        assert_eq!(Icon::from_name("rocket-ship"), Icon::Circle);
        assert_eq!(Icon::from_name(""), Icon::Circle);
        assert_eq!(Icon::from_name(" Hand_Coins "), Icon::HandCoins);
        assert_eq!(Icon::from_name("Masjid"), Icon::Mosque);
    }

    #[test]
    fn test_render_marks_icon_name() {
        let svg = Icon::from_name("nope").render().into_string();
        assert!(svg.contains(r#"data-icon="circle""#));
    }
}
