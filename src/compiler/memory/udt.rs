use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UdtField {
    pub id: String,
    pub type_id: String,
}

/// A user defined type which is active in the current scope.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UserDefinedType {
    pub id: String,
    pub fields: Vec<UdtField>,
}

impl UserDefinedType {
    pub fn new(id: &str, fields: Vec<UdtField>) -> UserDefinedType {
        UserDefinedType {
            id: id.into(),
            fields,
        }
    }

    pub fn field(&self, id: &str) -> Option<&UdtField> {
        self.fields.iter().find(|f| f.id == id)
    }
}
