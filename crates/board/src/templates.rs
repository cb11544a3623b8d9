use std::fmt;

use shared::domain::DEFAULT_TOPIC;

use crate::partition::Item;

struct Template {
    key: &'static str,
    display_name: &'static str,
    items: &'static [&'static str],
}

const TEMPLATES: &[Template] = &[
    Template {
        key: "blank",
        display_name: "Anything",
        items: &[],
    },
    Template {
        key: "basic_values",
        display_name: "Core Values",
        items: &[
            "Spirituality",
            "Family",
            "Friends",
            "Significant Other",
            "Health",
            "Learning",
            "Fun",
            "Career",
        ],
    },
    Template {
        key: "cuisines",
        display_name: "Cuisines",
        items: &[
            "Italian",
            "Mexican",
            "Japanese",
            "Indian",
            "Thai",
            "French",
            "Korean",
            "Chinese",
            "Mediterranean",
            "American",
            "German",
            "Spanish",
        ],
    },
    Template {
        key: "funny_situations",
        display_name: "Funny Situations",
        items: &[
            "Accidentally sending a text to the wrong person",
            "Mooching off your parents even though you're an adult",
        ],
    },
    Template {
        key: "love_languages",
        display_name: "Love Languages",
        items: &[
            "Acts of Service",
            "Quality Time",
            "Words of Affirmation",
            "Gifts",
            "Physical Touch",
        ],
    },
    Template {
        key: "romantic_gestures",
        display_name: "Romantic Gestures",
        items: &[
            "Breakfast in Bed",
            "Home-cooked Meal",
            "Surprise Event Tickets",
            "Small Thoughtful Gifts",
            "Cuddling",
            "Useful Gifts",
            "Movie Night",
            "Compliments, Love Letter",
            "Weekend Getaway",
            "Candlelight Dinner",
            "Massage/Spa",
        ],
    },
    Template {
        key: "movies",
        display_name: "Movie Genres",
        items: &[
            "Action",
            "Comedy",
            "Drama",
            "Horror",
            "Sci-Fi",
            "Romance",
            "Thriller",
            "Documentary",
            "Animation",
            "Fantasy",
        ],
    },
    Template {
        key: "music_genres",
        display_name: "Music Genres",
        items: &[
            "Pop",
            "Rock",
            "Hip Hop",
            "Jazz",
            "Classical",
            "Country",
            "Electronic",
            "R&B",
            "Folk",
            "Metal",
        ],
    },
    Template {
        key: "hobbies",
        display_name: "Hobbies",
        items: &[
            "Reading",
            "Gaming",
            "Sports",
            "Cooking",
            "Travel",
            "Photography",
            "Art",
            "Music",
            "Writing",
            "Gardening",
        ],
    },
    Template {
        key: "vacation_types",
        display_name: "Vacation Types",
        items: &[
            "Beach Resort",
            "Mountain Hiking",
            "City Exploration",
            "Road Trip",
            "Cruise",
            "Camping",
            "Theme Park",
            "Cultural Tour",
            "Adventure Sports",
            "Relaxing Spa",
        ],
    },
    Template {
        key: "pets",
        display_name: "Pets",
        items: &["Dog", "Cat", "Bird", "Fish"],
    },
    Template {
        key: "seasons",
        display_name: "Seasons",
        items: &["Spring", "Summer", "Fall", "Winter"],
    },
    Template {
        key: "coffee_drinks",
        display_name: "Coffee Drinks",
        items: &[
            "Espresso",
            "Latte",
            "Cappuccino",
            "Americano",
            "Mocha",
            "Cold Brew",
            "Macchiato",
            "Flat White",
            "Cortado",
            "Iced Coffee",
        ],
    },
];

/// Key of a ranking topic. Predefined keys come with default items; any
/// other text is a custom topic that starts empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Topic(String);

impl Topic {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Predefined topics as `(key, display name)`.
    pub fn predefined() -> impl Iterator<Item = (&'static str, &'static str)> {
        TEMPLATES
            .iter()
            .map(|template| (template.key, template.display_name))
    }

    pub fn key(&self) -> &str {
        &self.0
    }

    pub fn is_predefined(&self) -> bool {
        self.template().is_some()
    }

    pub fn display_name(&self) -> &str {
        self.template()
            .map(|template| template.display_name)
            .unwrap_or(self.0.as_str())
    }

    /// Default item list, in template order.
    pub fn items(&self) -> Vec<Item> {
        self.template()
            .map(|template| template.items.iter().map(|item| Item::from(*item)).collect())
            .unwrap_or_default()
    }

    fn template(&self) -> Option<&'static Template> {
        TEMPLATES.iter().find(|template| template.key == self.0)
    }
}

impl Default for Topic {
    fn default() -> Self {
        Self::new(DEFAULT_TOPIC)
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
