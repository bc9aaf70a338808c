//! Lead records and the scrape response envelope

use serde::{Deserialize, Serialize};

/// Contact information extracted from one artist profile.
///
/// Every field is always present; an empty string means "not found".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadRecord {
    pub url: String,
    pub name: String,
    pub email: String,
    pub instagram: String,
    pub twitter: String,
    pub youtube: String,
    pub website: String,
    pub bio: String,
}

impl LeadRecord {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// A lead is worth returning only when it carries an Instagram link
    pub fn is_qualified(&self) -> bool {
        let ig = self.instagram.trim();
        !ig.is_empty() && ig.to_lowercase().contains("instagram.com")
    }
}

/// Result of a full scrape (compact)
#[derive(Debug, Serialize, Deserialize)]
pub struct ScrapeResponse {
    pub success: bool,
    pub data: Vec<LeadRecord>,
    pub count: usize,
}

impl ScrapeResponse {
    /// Keep only qualified leads; `count` always matches `data`
    pub fn from_leads(leads: Vec<LeadRecord>) -> Self {
        let data: Vec<LeadRecord> = leads.into_iter().filter(|l| l.is_qualified()).collect();
        let count = data.len();
        Self {
            success: true,
            data,
            count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_qualified() {
        let mut lead = LeadRecord::new("https://soundcloud.com/a");
        assert!(!lead.is_qualified());

        lead.instagram = "   ".to_string();
        assert!(!lead.is_qualified());

        lead.instagram = "https://twitter.com/a".to_string();
        assert!(!lead.is_qualified());

        lead.instagram = "https://www.Instagram.com/a".to_string();
        assert!(lead.is_qualified());
    }

    #[test]
    fn test_from_leads_filters_and_counts() {
        let mut with_ig = LeadRecord::new("https://soundcloud.com/a");
        with_ig.name = "A".to_string();
        with_ig.instagram = "https://instagram.com/a".to_string();
        let mut without = LeadRecord::new("https://soundcloud.com/b");
        without.name = "B".to_string();

        let resp = ScrapeResponse::from_leads(vec![with_ig, without]);
        assert!(resp.success);
        assert_eq!(resp.count, 1);
        assert_eq!(resp.data[0].name, "A");

        let empty = ScrapeResponse::from_leads(vec![]);
        assert!(empty.success);
        assert_eq!(empty.count, 0);
    }

    #[test]
    fn test_serializes_all_fields() {
        let json = serde_json::to_value(LeadRecord::new("u")).unwrap();
        for key in ["url", "name", "email", "instagram", "twitter", "youtube", "website", "bio"] {
            assert!(json[key].is_string(), "missing {}", key);
        }
    }
}
