//! Five-icon star strips derived from numeric ratings.
//!
//! The rule is a floor/ceil split: `floor(r)` full stars, one half star when
//! `r` has a fractional part, and `5 - ceil(r)` empty stars. The three counts
//! always add up to [`MAX_STARS`].

/// Number of icons in a star strip.
pub const MAX_STARS: u8 = 5;

/// A single icon in a star strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StarIcon {
    Full,
    Half,
    Empty,
}

impl StarIcon {
    /// Icon font class used by the storefront markup.
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Full => "bx bxs-star",
            Self::Half => "bx bxs-star-half",
            Self::Empty => "bx bx-star",
        }
    }

    /// Text glyph for terminal output.
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            Self::Full => '★',
            Self::Half => '⯪',
            Self::Empty => '☆',
        }
    }
}

/// Star counts for one rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StarStrip {
    /// Number of full stars.
    pub full: u8,
    /// Whether a half star follows the full stars.
    pub half: bool,
    /// Number of trailing empty stars.
    pub empty: u8,
}

impl StarStrip {
    /// Build the strip for a rating.
    ///
    /// Ratings are clamped into `0.0..=5.0`; `NaN` renders as zero stars.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // clamped to 0..=5
    pub fn from_rating(rating: f64) -> Self {
        let rating = if rating.is_nan() {
            0.0
        } else {
            rating.clamp(0.0, f64::from(MAX_STARS))
        };

        let full = rating.floor() as u8;
        let half = rating.fract() > 0.0;
        let empty = MAX_STARS - rating.ceil() as u8;

        Self { full, half, empty }
    }

    /// Number of half stars (zero or one).
    #[must_use]
    pub const fn half_count(&self) -> u8 {
        if self.half { 1 } else { 0 }
    }

    /// Icons in display order: full, half, empty.
    pub fn icons(&self) -> impl Iterator<Item = StarIcon> {
        std::iter::repeat_n(StarIcon::Full, usize::from(self.full))
            .chain(std::iter::repeat_n(
                StarIcon::Half,
                usize::from(self.half_count()),
            ))
            .chain(std::iter::repeat_n(StarIcon::Empty, usize::from(self.empty)))
    }

    /// Markup for the strip, one `<i>` element per icon.
    #[must_use]
    pub fn to_html(&self) -> String {
        self.icons()
            .map(|icon| format!(r#"<i class="{}"></i>"#, icon.css_class()))
            .collect()
    }
}

impl std::fmt::Display for StarStrip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.icons().try_for_each(|icon| write!(f, "{}", icon.glyph()))
    }
}
