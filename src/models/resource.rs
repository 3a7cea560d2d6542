/// Describes one REST collection backed by a single table.
///
/// Every resource has an integer `id` column generated by the store plus the
/// listed required string fields. Table and field names are only ever taken
/// from these static descriptors, never from request input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resource {
    /// singular name used in messages, e.g. "post"
    pub name: &'static str,
    /// table name, also the path segment under `/api`
    pub table: &'static str,
    pub fields: &'static [&'static str],
}

impl Resource {
    pub fn path(&self) -> String {
        format!("/{}", self.table)
    }

    pub fn list_failure_message(&self) -> String {
        format!("The {} information could not be retrieved.", self.table)
    }

    pub fn fetch_failure_message(&self) -> String {
        format!("The {} information could not be retrieved.", self.name)
    }

    pub fn not_found_message(&self) -> String {
        format!("The {} with the specified ID does not exist.", self.name)
    }

    pub fn missing_fields_message(&self) -> String {
        format!("Please provide {} for the {}.", self.fields.join(" and "), self.name)
    }

    pub fn save_failure_message(&self) -> String {
        format!("There was an error while saving the {} to the database", self.name)
    }

    pub fn modify_failure_message(&self) -> String {
        format!("The {} information could not be modified.", self.name)
    }

    pub fn remove_failure_message(&self) -> String {
        format!("The {} could not be removed", self.name)
    }
}
