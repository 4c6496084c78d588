use super::{Berth, BerthField, Boat, BoatField};

use fieldwise::{
    Entity, FieldAware, FieldGraph, FieldSet, FieldTag, FieldTree, FieldVisitor, FieldVisitorMut,
    Result,
};
use indexmap::IndexMap;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, FieldTag)]
pub enum MarinaField {
    Id,
    Name,
    /// Moored boats by mooring label
    #[field(nested = BoatField)]
    Boats,
    #[field(nested = BerthField)]
    Berths,
}

#[derive(Debug, Clone)]
pub struct Marina {
    id: u64,
    fields: FieldSet<MarinaField>,
    name: String,
    boats: IndexMap<String, Boat>,
    berths: HashSet<Berth>,
}

impl Marina {
    pub fn new(id: u64, name: &str) -> Marina {
        let mut marina = Marina::reference_to(id);
        marina.field_set(MarinaField::Id);
        marina.set_name(name);
        marina
    }

    pub fn name(&self) -> Result<&str> {
        self.field_get(MarinaField::Name, self.name.as_str())
    }

    pub fn set_name(&mut self, name: &str) -> &mut Self {
        self.name = name.to_string();
        self.field_set(MarinaField::Name);
        self
    }

    pub fn boats(&self) -> Result<&IndexMap<String, Boat>> {
        self.field_get(MarinaField::Boats, &self.boats)
    }

    pub fn set_boats(&mut self, boats: IndexMap<String, Boat>) -> &mut Self {
        self.boats = boats;
        self.field_set(MarinaField::Boats);
        self
    }

    pub fn berths(&self) -> Result<&HashSet<Berth>> {
        self.field_get(MarinaField::Berths, &self.berths)
    }

    pub fn set_berths(&mut self, berths: HashSet<Berth>) -> &mut Self {
        self.berths = berths;
        self.field_set(MarinaField::Berths);
        self
    }
}

impl PartialEq for Marina {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl FieldAware for Marina {
    type Field = MarinaField;

    fn fields(&self) -> &FieldSet<MarinaField> {
        &self.fields
    }

    fn fields_mut(&mut self) -> &mut FieldSet<MarinaField> {
        &mut self.fields
    }

    fn reference(&self) -> Self {
        Marina::reference_to(self.id)
    }

    fn pull(
        &mut self,
        field: MarinaField,
        other: &Self,
        graph: Option<&FieldGraph<MarinaField>>,
    ) -> Result<()> {
        match field {
            MarinaField::Id => self.id = other.id,
            MarinaField::Name => self.name = other.name.clone(),
            MarinaField::Boats => {
                self.boats = FieldTree::<Boat>::clone_tree(&other.boats, field, graph)?
            }
            MarinaField::Berths => {
                self.berths = FieldTree::<Berth>::clone_tree(&other.berths, field, graph)?
            }
        }
        self.field_set(field);
        Ok(())
    }

    fn visit<V: FieldVisitor>(&self, field: MarinaField, visitor: V) -> V::Output {
        match field {
            MarinaField::Boats => visitor.nested::<Boat, _>(&self.boats),
            MarinaField::Berths => visitor.nested::<Berth, _>(&self.berths),
            _ => visitor.scalar(),
        }
    }

    fn visit_mut<V: FieldVisitorMut>(
        &mut self,
        field: MarinaField,
        other: Option<&Self>,
        visitor: V,
    ) -> V::Output {
        match field {
            MarinaField::Boats => {
                visitor.nested::<Boat, _>(&mut self.boats, other.map(|other| &other.boats))
            }
            MarinaField::Berths => {
                visitor.nested::<Berth, _>(&mut self.berths, other.map(|other| &other.berths))
            }
            _ => visitor.scalar(),
        }
    }
}

impl Entity for Marina {
    type Id = u64;

    fn id(&self) -> &u64 {
        &self.id
    }

    fn reference_to(id: u64) -> Self {
        Marina {
            id,
            fields: FieldSet::new(),
            name: String::new(),
            boats: IndexMap::new(),
            berths: HashSet::new(),
        }
    }
}
