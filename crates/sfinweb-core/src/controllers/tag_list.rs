//! Tag list view

use crate::models::Tag;
use crate::resolve::TagListData;

/// Displays the resolved tags, nothing else
#[derive(Debug, Clone)]
pub struct TagListController {
    tags: Vec<Tag>,
}

impl TagListController {
    pub fn new(data: TagListData) -> Self {
        Self { tags: data.tags }
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_are_shown_verbatim() {
        let tags = vec![
            Tag { id: 2, name: "travel".to_string() },
            Tag { id: 1, name: "food".to_string() },
        ];
        let controller = TagListController::new(TagListData { tags: tags.clone() });
        assert_eq!(controller.tags(), tags.as_slice());
    }
}
