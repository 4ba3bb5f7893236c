//! Commented document tree shared by every format.
//!
//! A [`Document`] is an ordered tree of [`Table`]s. Each key maps to an
//! [`Entry`] holding the comments written above the key and either a plain
//! [`Value`] or a nested table. Key order follows the source file; keys
//! added later are appended.
//!
//! Paths are dotted (`a.b.name`); each segment names one table level.

use indexmap::IndexMap;

use crate::value::Value;

/// One key of a table: its comments and its content.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub comments: Vec<String>,
    pub node: Node,
}

impl Entry {
    pub fn new(node: Node) -> Self {
        Self {
            comments: Vec::new(),
            node,
        }
    }

    pub fn value(value: Value) -> Self {
        Self::new(Node::Value(value))
    }

    pub fn table(table: Table) -> Self {
        Self::new(Node::Table(table))
    }

    pub fn with_comments<S: AsRef<str>>(mut self, comments: &[S]) -> Self {
        self.comments = comments.iter().map(|c| c.as_ref().to_string()).collect();
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Value(Value),
    Table(Table),
}

impl Node {
    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Node::Table(table) => Some(table),
            Node::Value(_) => None,
        }
    }

    pub fn as_table_mut(&mut self) -> Option<&mut Table> {
        match self {
            Node::Table(table) => Some(table),
            Node::Value(_) => None,
        }
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Node::Value(value) => Some(value),
            Node::Table(_) => None,
        }
    }

    /// Flatten the node into a plain value; tables become maps and lose
    /// their comments.
    pub fn to_value(&self) -> Value {
        match self {
            Node::Value(value) => value.clone(),
            Node::Table(table) => table.to_value(),
        }
    }

    fn make_table(&mut self) -> &mut Table {
        if !matches!(self, Node::Table(_)) {
            *self = Node::Table(Table::new());
        }
        match self {
            Node::Table(table) => table,
            Node::Value(_) => unreachable!("node was just replaced by a table"),
        }
    }
}

/// Ordered map from key to [`Entry`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    entries: IndexMap<String, Entry>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Entry)> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&Node> {
        self.entries.get(key).map(|e| &e.node)
    }

    pub fn entry(&self, key: &str) -> Option<&Entry> {
        self.entries.get(key)
    }

    pub fn entry_mut(&mut self, key: &str) -> Option<&mut Entry> {
        self.entries.get_mut(key)
    }

    /// Insert or replace an entry. A replaced entry keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, entry: Entry) -> Option<Entry> {
        self.entries.insert(key.into(), entry)
    }

    pub fn remove(&mut self, key: &str) -> Option<Entry> {
        self.entries.shift_remove(key)
    }

    /// Look up the entry at a dotted path.
    pub fn entry_path(&self, path: &str) -> Option<&Entry> {
        let mut segments = path.split('.');
        let mut entry = self.entries.get(segments.next()?)?;
        for segment in segments {
            entry = entry.node.as_table()?.entries.get(segment)?;
        }
        Some(entry)
    }

    pub fn get_path(&self, path: &str) -> Option<&Node> {
        self.entry_path(path).map(|e| &e.node)
    }

    /// Look up an entry by already-split key segments. Parsers use this to
    /// attach comments to keys that may themselves contain dots.
    pub fn entry_by_segments_mut<S: AsRef<str>>(&mut self, segments: &[S]) -> Option<&mut Entry> {
        let (first, rest) = segments.split_first()?;
        let mut entry = self.entries.get_mut(first.as_ref())?;
        for segment in rest {
            entry = entry.node.as_table_mut()?.entries.get_mut(segment.as_ref())?;
        }
        Some(entry)
    }

    /// Store `value` at a dotted path, creating intermediate tables.
    ///
    /// An existing entry keeps its comments; `comments` only label an entry
    /// created by this call.
    pub fn set_value<S: AsRef<str>>(&mut self, path: &str, value: Value, comments: &[S]) {
        let (table, key) = match path.rsplit_once('.') {
            Some((parent, key)) => (self.section_mut::<&str>(parent, &[]), key),
            None => (self, path),
        };
        match table.entries.get_mut(key) {
            Some(entry) => entry.node = Node::Value(value),
            None => {
                table
                    .entries
                    .insert(key.to_string(), Entry::value(value).with_comments(comments));
            }
        }
    }

    /// Get the table at a dotted path, creating it (and its parents) when
    /// absent. A plain value in the way is replaced by a table.
    ///
    /// `comments` label the innermost table only when it is created here.
    pub fn section_mut<S: AsRef<str>>(&mut self, path: &str, comments: &[S]) -> &mut Table {
        let segments: Vec<&str> = path.split('.').collect();
        let last = segments.len() - 1;
        let mut table = self;
        for (i, segment) in segments.into_iter().enumerate() {
            let entry = table.entries.entry(segment.to_string()).or_insert_with(|| {
                let created = Entry::table(Table::new());
                if i == last {
                    created.with_comments(comments)
                } else {
                    created
                }
            });
            table = entry.node.make_table();
        }
        table
    }

    /// Flatten into a [`Value::Map`], dropping comments.
    pub fn to_value(&self) -> Value {
        Value::Map(
            self.entries
                .iter()
                .map(|(k, e)| (k.clone(), e.node.to_value()))
                .collect(),
        )
    }
}

/// A parsed or generated configuration file.
///
/// The root table never carries comments of its own.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    root: Table,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(&self) -> &Table {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Table {
        &mut self.root
    }

    pub fn into_root(self) -> Table {
        self.root
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    pub fn get(&self, path: &str) -> Option<&Node> {
        self.root.get_path(path)
    }

    /// The value at `path`, with tables flattened into maps.
    pub fn value(&self, path: &str) -> Option<Value> {
        self.get(path).map(Node::to_value)
    }

    pub fn comments(&self, path: &str) -> Option<&[String]> {
        self.root.entry_path(path).map(|e| e.comments.as_slice())
    }
}

impl From<Table> for Document {
    fn from(root: Table) -> Self {
        Self { root }
    }
}
