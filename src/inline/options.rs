use crate::error::{InlinerError, Result};

/// Settings for [`Inliner`](super::Inliner).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlinerOptions {
    strip_attributes: Vec<String>,
}

impl Default for InlinerOptions {
    fn default() -> Self {
        InlinerOptions {
            strip_attributes: vec!["class".to_owned(), "id".to_owned()],
        }
    }
}

impl InlinerOptions {
    /// Attributes removed from every element once the styles are inlined.
    pub fn strip_attributes<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.strip_attributes = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn keep_attributes(self) -> Self {
        self.strip_attributes(Vec::<String>::new())
    }

    pub fn stripped_attributes(&self) -> &[String] {
        &self.strip_attributes
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self
            .strip_attributes
            .iter()
            .any(|name| name.trim().is_empty())
        {
            return Err(InlinerError::invalid_argument(
                "strip_attributes",
                "attribute names must not be empty",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_class_and_id_by_default() {
        assert_eq!(
            InlinerOptions::default().stripped_attributes(),
            &["class".to_owned(), "id".to_owned()]
        );
    }

    #[test]
    fn empty_attribute_names_are_rejected() {
        assert!(InlinerOptions::default().validate().is_ok());
        assert!(InlinerOptions::default().keep_attributes().validate().is_ok());
        assert!(InlinerOptions::default()
            .strip_attributes(vec!["id", " "])
            .validate()
            .is_err());
    }
}
