//! Publish-time enumerations.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::codes::platform_codes;

platform_codes! {
    /// Video category with its platform code.
    pub enum VideoCategory {
        VideoGame = 22 => "video_game",
        Sports = 11 => "sports",
        CartoonAnimation = 18 => "cartoon_animation",
        Comedy = 2 => "comedy",
        Education = 3 => "education",
        Entertainment = 4 => "entertainment",
        MovieSeriesDocumentary = 5 => "movie_series_documentary",
        Religion = 6 => "religion",
        Music = 7 => "music",
        News = 8 => "news",
        LawPolitics = 9 => "law_politics",
        TechnologyComputer = 10 => "technology_computer",
        TravelTourism = 13 => "travel_tourism",
        Animals = 14 => "animals",
        Business = 16 => "business",
        CultureArt = 17 => "culture_art",
        FashionStyle = 20 => "fashion_style",
        Health = 21 => "health",
        FoodDrink = 23 => "food_drink",
        Automotive = 24 => "automotive",
        FamilyChild = 25 => "family_child",
        HomeLife = 26 => "home_life",
        Environment = 27 => "environment",
        FinanceEconomy = 28 => "finance_economy",
        Social = 29 => "social",
        BasicSciences = 30 => "basic_sciences",
        AgricultureHorticulture = 31 => "agriculture_horticulture",
    }
}

/// Who may comment on a published video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentPolicy {
    /// Comments are published immediately (default).
    #[default]
    Yes,
    /// Comments wait for the owner's approval.
    Approve,
    /// Comments are disabled.
    No,
}

impl CommentPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            CommentPolicy::Yes => "yes",
            CommentPolicy::Approve => "approve",
            CommentPolicy::No => "no",
        }
    }

    /// Whether a video with this `comment_enable` value accepts new comments.
    pub fn accepts_comments(value: &str) -> bool {
        matches!(value, "yes" | "approve")
    }
}

impl fmt::Display for CommentPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommentPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "yes" => Ok(CommentPolicy::Yes),
            "approve" => Ok(CommentPolicy::Approve),
            "no" => Ok(CommentPolicy::No),
            _ => Err(format!("Unknown comment policy: {}", s)),
        }
    }
}
