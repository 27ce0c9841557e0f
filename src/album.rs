use std::fmt;

/// An album as listed by `Albums::get`. Read-only; built by
/// `response::decode_album_list`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Album {
    id: String,
    name: String,
    password_protected: bool,
}

impl Album {
    pub fn new(id: impl Into<String>, name: impl Into<String>, password_protected: bool) -> Self {
        Album {
            id: id.into(),
            name: name.into(),
            password_protected,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn password_protected(&self) -> bool {
        self.password_protected
    }
}

impl fmt::Display for Album {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}", self.id, self.name)?;
        if self.password_protected {
            write!(f, "\t(password protected)")?;
        }
        Ok(())
    }
}
