use super::{Boat, BoatField};

use fieldwise::{
    Entity, FieldAware, FieldGraph, FieldSet, FieldTag, FieldTree, FieldVisitor, FieldVisitorMut,
    Result,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, FieldTag)]
pub enum PersonField {
    Id,
    Name,
    Email,
    #[field(nested = BoatField)]
    Boat,
}

#[derive(Debug, Clone)]
pub struct Person {
    id: u64,
    fields: FieldSet<PersonField>,
    name: String,
    email: String,
    boat: Option<Boat>,
}

impl Person {
    /// A person with `id` and `name` initialized.
    pub fn new(id: u64, name: &str) -> Person {
        let mut person = Person::reference_to(id);
        person.field_set(PersonField::Id);
        person.set_name(name);
        person
    }

    pub fn name(&self) -> Result<&str> {
        self.field_get(PersonField::Name, self.name.as_str())
    }

    pub fn set_name(&mut self, name: &str) -> &mut Self {
        self.name = name.to_string();
        self.field_set(PersonField::Name);
        self
    }

    pub fn email(&self) -> Result<&str> {
        self.field_get(PersonField::Email, self.email.as_str())
    }

    pub fn set_email(&mut self, email: &str) -> &mut Self {
        self.email = email.to_string();
        self.field_set(PersonField::Email);
        self
    }

    pub fn boat(&self) -> Result<Option<&Boat>> {
        self.field_get(PersonField::Boat, &self.boat)
            .map(Option::as_ref)
    }

    pub fn boat_mut(&mut self) -> Option<&mut Boat> {
        self.boat.as_mut()
    }

    pub fn set_boat(&mut self, boat: Option<Boat>) -> &mut Self {
        self.boat = boat;
        self.field_set(PersonField::Boat);
        self
    }
}

impl PartialEq for Person {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Person {}

impl std::hash::Hash for Person {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl FieldAware for Person {
    type Field = PersonField;

    fn fields(&self) -> &FieldSet<PersonField> {
        &self.fields
    }

    fn fields_mut(&mut self) -> &mut FieldSet<PersonField> {
        &mut self.fields
    }

    fn reference(&self) -> Self {
        Person::reference_to(self.id)
    }

    fn pull(
        &mut self,
        field: PersonField,
        other: &Self,
        graph: Option<&FieldGraph<PersonField>>,
    ) -> Result<()> {
        match field {
            PersonField::Id => self.id = other.id,
            PersonField::Name => self.name = other.name.clone(),
            PersonField::Email => self.email = other.email.clone(),
            PersonField::Boat => {
                self.boat = FieldTree::<Boat>::clone_tree(&other.boat, field, graph)?
            }
        }
        self.field_set(field);
        Ok(())
    }

    fn visit<V: FieldVisitor>(&self, field: PersonField, visitor: V) -> V::Output {
        match field {
            PersonField::Boat => visitor.nested::<Boat, _>(&self.boat),
            _ => visitor.scalar(),
        }
    }

    fn visit_mut<V: FieldVisitorMut>(
        &mut self,
        field: PersonField,
        other: Option<&Self>,
        visitor: V,
    ) -> V::Output {
        match field {
            PersonField::Boat => {
                visitor.nested::<Boat, _>(&mut self.boat, other.map(|other| &other.boat))
            }
            _ => visitor.scalar(),
        }
    }
}

impl Entity for Person {
    type Id = u64;

    fn id(&self) -> &u64 {
        &self.id
    }

    fn reference_to(id: u64) -> Self {
        Person {
            id,
            fields: FieldSet::new(),
            name: String::new(),
            email: String::new(),
            boat: None,
        }
    }
}
