/// Extends string types with useful functions
pub trait StringExt {
    /// Capitalises the first letter in a string
    ///
    /// Material keys are stored lowercase, but are nicer capitalised in
    /// summaries.
    ///
    /// ```rust
    /// # use gtools_utils::StringExt;
    /// assert_eq!("water".capitalise(), "Water".to_string());
    /// assert_eq!("".capitalise(), "".to_string());
    /// ```
    fn capitalise(&self) -> String;

    /// Normalise a material identifier for lookups
    ///
    /// Trims whitespace and lowercases, so "Water ", "WATER" and "water" all
    /// refer to the same material.
    ///
    /// ```rust
    /// # use gtools_utils::StringExt;
    /// assert_eq!(" Bone".material_key(), "bone".to_string());
    /// ```
    fn material_key(&self) -> String;
}

impl<T: AsRef<str>> StringExt for T {
    fn capitalise(&self) -> String {
        let mut c = self.as_ref().chars();
        match c.next() {
            Some(first) => first.to_uppercase().chain(c).collect(),
            None => String::new(),
        }
    }

    fn material_key(&self) -> String {
        self.as_ref().trim().to_lowercase()
    }
}
