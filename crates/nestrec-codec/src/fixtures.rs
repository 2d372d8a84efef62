//! Domain types shared by the codec tests.

use nestrec_transcode::GeoCoordinate;
use nestrec_types::CascadeAction;

use crate::decode::{KeyedDecoder, SingleValueDecoder};
use crate::encode::{KeyedEncoder, SingleValueEncoder};
use crate::error::{DecodeResult, EncodeResult};
use crate::traits::{
    RecordDecodable, RecordEncodable, RecordRepresentable, ValueDecodable, ValueEncodable,
};

#[derive(Clone, Debug, PartialEq)]
pub struct Isbn(pub String);

impl ValueEncodable for Isbn {
    fn encode_value(&self, container: SingleValueEncoder<'_>) -> EncodeResult<()> {
        container.encode(&self.0)
    }
}

impl ValueDecodable for Isbn {
    fn decode_value(container: SingleValueDecoder<'_>) -> DecodeResult<Self> {
        container.decode().map(Isbn)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Book {
    pub id: String,
    pub title: String,
    pub isbn: Isbn,
    pub tags: Vec<String>,
}

impl Book {
    pub fn new(id: &str, title: &str) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            isbn: Isbn(format!("978-{id}")),
            tags: vec!["fiction".into()],
        }
    }
}

impl RecordRepresentable for Book {
    const RECORD_TYPE: &'static str = "Book";

    fn record_name(&self) -> &str {
        &self.id
    }
}

impl RecordEncodable for Book {
    fn encode_fields(&self, c: &mut KeyedEncoder<'_>) -> EncodeResult<()> {
        c.encode("title", &self.title)?;
        c.encode_value("isbn", &self.isbn)?;
        c.encode_list("tags", &self.tags)
    }
}

impl RecordDecodable for Book {
    fn decode_fields(c: &KeyedDecoder<'_>) -> DecodeResult<Self> {
        Ok(Self {
            id: c.record_id().name.clone(),
            title: c.decode("title")?,
            isbn: c.decode_value("isbn")?,
            tags: c.decode_list("tags")?,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Address {
    pub street: String,
    pub city: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Person {
    pub id: String,
    pub name: String,
    pub age: i32,
    pub photo: Vec<u8>,
    pub address: Address,
    pub nickname: Option<String>,
    pub books: Vec<Book>,
    /// Name of the owning school, stored as a back-reference.
    pub school: Option<String>,
}

impl Person {
    pub fn new(id: &str, name: &str, age: i32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            age,
            photo: vec![0xFF, 0xD8, 0xFF, age as u8],
            address: Address {
                street: format!("{age} Main St"),
                city: "Springfield".into(),
            },
            nickname: None,
            books: Vec::new(),
            school: None,
        }
    }
}

impl RecordRepresentable for Person {
    const RECORD_TYPE: &'static str = "Person";

    fn record_name(&self) -> &str {
        &self.id
    }

    fn reference_action(&self, field: &str) -> CascadeAction {
        match field {
            "books" => CascadeAction::Independent,
            _ => CascadeAction::DeleteWithParent,
        }
    }
}

impl RecordEncodable for Person {
    fn encode_fields(&self, c: &mut KeyedEncoder<'_>) -> EncodeResult<()> {
        c.encode("name", &self.name)?;
        c.encode("age", &self.age)?;
        c.encode("photo", &self.photo)?;
        {
            let mut address = c.nested_keyed("address");
            address.encode("street", &self.address.street)?;
            address.encode("city", &self.address.city)?;
        }
        c.encode_if_present("nickname", self.nickname.as_ref())?;
        {
            let mut books = c.unkeyed("books");
            for book in &self.books {
                books.push_object(book)?;
            }
        }
        if let Some(school) = &self.school {
            c.encode_reference("school", school, CascadeAction::Independent)?;
        }
        Ok(())
    }
}

impl RecordDecodable for Person {
    fn decode_fields(c: &KeyedDecoder<'_>) -> DecodeResult<Self> {
        let address = c.nested_keyed("address");
        let mut books = Vec::new();
        let mut sequence = c.unkeyed("books")?;
        while !sequence.is_at_end() {
            books.push(sequence.next_object()?);
        }
        let school = if c.contains("school") {
            Some(c.reference("school")?.target_name().to_string())
        } else {
            None
        };
        Ok(Self {
            id: c.record_id().name.clone(),
            name: c.decode("name")?,
            age: c.decode("age")?,
            photo: c.decode("photo")?,
            address: Address {
                street: address.decode("street")?,
                city: address.decode("city")?,
            },
            nickname: c.decode_if_present("nickname")?,
            books,
            school,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct School {
    pub id: String,
    pub title: String,
    pub location: GeoCoordinate,
    pub students: Vec<Person>,
    pub principal: Option<Person>,
    /// Never stored.
    pub cache_key: String,
}

impl RecordRepresentable for School {
    const RECORD_TYPE: &'static str = "School";

    fn record_name(&self) -> &str {
        &self.id
    }

    fn ignored_fields(&self) -> &[&str] {
        &["cache_key"]
    }
}

impl RecordEncodable for School {
    fn encode_fields(&self, c: &mut KeyedEncoder<'_>) -> EncodeResult<()> {
        c.encode("title", &self.title)?;
        c.encode("location", &self.location)?;
        c.encode_objects("students", &self.students)?;
        c.encode_object_if_present("principal", self.principal.as_ref())?;
        c.encode("cache_key", &self.cache_key)
    }
}

impl RecordDecodable for School {
    fn decode_fields(c: &KeyedDecoder<'_>) -> DecodeResult<Self> {
        Ok(Self {
            id: c.record_id().name.clone(),
            title: c.decode("title")?,
            location: c.decode("location")?,
            students: c.decode_objects("students")?,
            principal: c.decode_object_if_present("principal")?,
            cache_key: String::new(),
        })
    }
}

/// A school with two students who share one book, and a principal.
pub fn sample_school() -> School {
    let shared = Book::new("book-1", "Dune");
    let mut alice = Person::new("person-1", "Alice", 16);
    alice.books = vec![shared.clone(), Book::new("book-2", "Emma")];
    alice.nickname = Some("Al".into());
    alice.school = Some("school-1".into());
    let mut bob = Person::new("person-2", "Bob", 17);
    bob.books = vec![shared];
    bob.school = Some("school-1".into());

    School {
        id: "school-1".into(),
        title: "Central High".into(),
        location: GeoCoordinate::new(37.331274, -122.030397),
        students: vec![alice, bob],
        principal: Some(Person::new("person-9", "Skinner", 45)),
        cache_key: "transient".into(),
    }
}

/// A node that may contain another node; used for self-containment tests.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub id: String,
    pub child: Option<Box<Node>>,
}

impl RecordRepresentable for Node {
    const RECORD_TYPE: &'static str = "Node";

    fn record_name(&self) -> &str {
        &self.id
    }
}

impl RecordEncodable for Node {
    fn encode_fields(&self, c: &mut KeyedEncoder<'_>) -> EncodeResult<()> {
        c.encode_object_if_present("child", self.child.as_deref())
    }
}

impl RecordDecodable for Node {
    fn decode_fields(c: &KeyedDecoder<'_>) -> DecodeResult<Self> {
        Ok(Self {
            id: c.record_id().name.clone(),
            child: c.decode_object_if_present("child")?.map(Box::new),
        })
    }
}

/// Scalar samples stored through an unkeyed view, plus a label written
/// from inside a nested view through the unprefixed super container.
#[derive(Clone, Debug, PartialEq)]
pub struct Reading {
    pub id: String,
    pub samples: Vec<i64>,
    pub unit: String,
    pub label: String,
}

impl RecordRepresentable for Reading {
    const RECORD_TYPE: &'static str = "Reading";

    fn record_name(&self) -> &str {
        &self.id
    }
}

impl RecordEncodable for Reading {
    fn encode_fields(&self, c: &mut KeyedEncoder<'_>) -> EncodeResult<()> {
        {
            let mut samples = c.unkeyed("samples");
            for sample in &self.samples {
                samples.push(sample)?;
            }
        }
        let mut meta = c.nested_keyed("meta");
        meta.encode("unit", &self.unit)?;
        meta.super_encoder().encode("label", &self.label)
    }
}

impl RecordDecodable for Reading {
    fn decode_fields(c: &KeyedDecoder<'_>) -> DecodeResult<Self> {
        let mut sequence = c.unkeyed("samples")?;
        let mut samples: Vec<i64> = Vec::with_capacity(sequence.count());
        while !sequence.is_at_end() {
            samples.push(sequence.next()?);
        }
        let meta = c.nested_keyed("meta");
        Ok(Self {
            id: c.record_id().name.clone(),
            samples,
            unit: meta.decode("unit")?,
            label: meta.super_decoder().decode("label")?,
        })
    }
}

/// A home whose address is ignored wholesale, including its nested keys.
#[derive(Clone, Debug, PartialEq)]
pub struct Home {
    pub id: String,
    pub owner: String,
    pub address: Address,
}

impl RecordRepresentable for Home {
    const RECORD_TYPE: &'static str = "Home";

    fn record_name(&self) -> &str {
        &self.id
    }

    fn ignored_fields(&self) -> &[&str] {
        &["address"]
    }
}

impl RecordEncodable for Home {
    fn encode_fields(&self, c: &mut KeyedEncoder<'_>) -> EncodeResult<()> {
        c.encode("owner", &self.owner)?;
        c.encode("address.zip", &"00000".to_string())?;
        let mut address = c.nested_keyed("address");
        address.encode("street", &self.address.street)?;
        address.super_encoder().encode("city", &self.address.city)?;
        let mut geo = address.nested_keyed("geo");
        geo.encode("lat", &1.5_f64)
    }
}
