use super::{Berth, BerthField, Boat, BoatField};

use fieldwise::{
    Entity, FieldAware, FieldGraph, FieldSet, FieldTag, FieldTree, FieldVisitor, FieldVisitorMut,
    Result,
};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, FieldTag)]
pub enum CarrierField {
    Id,
    Name,
    /// Boats grouped by route
    #[field(nested = BoatField)]
    Fleet,
    /// Berths leased, with the routes served from each
    #[field(nested = BerthField)]
    Leases,
    /// Berths reassigned from one to another
    #[field(nested = BerthField)]
    Swaps,
    /// Trips per route. Declared nested, but holds no berths.
    #[field(nested = BerthField)]
    Tally,
}

#[derive(Debug, Clone)]
pub struct Carrier {
    id: u64,
    fields: FieldSet<CarrierField>,
    name: String,
    fleet: BTreeMap<String, Vec<Boat>>,
    leases: HashMap<Berth, Vec<String>>,
    swaps: HashMap<Berth, Berth>,
    tally: HashMap<String, u32>,
}

impl Carrier {
    pub fn new(id: u64, name: &str) -> Carrier {
        let mut carrier = Carrier::reference_to(id);
        carrier.field_set(CarrierField::Id);
        carrier.name = name.to_string();
        carrier.field_set(CarrierField::Name);
        carrier
    }

    pub fn name(&self) -> Result<&str> {
        self.field_get(CarrierField::Name, self.name.as_str())
    }

    pub fn fleet(&self) -> Result<&BTreeMap<String, Vec<Boat>>> {
        self.field_get(CarrierField::Fleet, &self.fleet)
    }

    pub fn set_fleet(&mut self, fleet: BTreeMap<String, Vec<Boat>>) -> &mut Self {
        self.fleet = fleet;
        self.field_set(CarrierField::Fleet);
        self
    }

    pub fn leases(&self) -> Result<&HashMap<Berth, Vec<String>>> {
        self.field_get(CarrierField::Leases, &self.leases)
    }

    pub fn set_leases(&mut self, leases: HashMap<Berth, Vec<String>>) -> &mut Self {
        self.leases = leases;
        self.field_set(CarrierField::Leases);
        self
    }

    pub fn swaps(&self) -> Result<&HashMap<Berth, Berth>> {
        self.field_get(CarrierField::Swaps, &self.swaps)
    }

    pub fn set_swaps(&mut self, swaps: HashMap<Berth, Berth>) -> &mut Self {
        self.swaps = swaps;
        self.field_set(CarrierField::Swaps);
        self
    }

    pub fn set_tally(&mut self, tally: HashMap<String, u32>) -> &mut Self {
        self.tally = tally;
        self.field_set(CarrierField::Tally);
        self
    }
}

impl PartialEq for Carrier {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl FieldAware for Carrier {
    type Field = CarrierField;

    fn fields(&self) -> &FieldSet<CarrierField> {
        &self.fields
    }

    fn fields_mut(&mut self) -> &mut FieldSet<CarrierField> {
        &mut self.fields
    }

    fn reference(&self) -> Self {
        Carrier::reference_to(self.id)
    }

    fn pull(
        &mut self,
        field: CarrierField,
        other: &Self,
        graph: Option<&FieldGraph<CarrierField>>,
    ) -> Result<()> {
        match field {
            CarrierField::Id => self.id = other.id,
            CarrierField::Name => self.name = other.name.clone(),
            CarrierField::Fleet => {
                self.fleet = FieldTree::<Boat>::clone_tree(&other.fleet, field, graph)?
            }
            CarrierField::Leases => {
                self.leases = FieldTree::<Berth>::clone_tree(&other.leases, field, graph)?
            }
            CarrierField::Swaps => {
                self.swaps = FieldTree::<Berth>::clone_tree(&other.swaps, field, graph)?
            }
            CarrierField::Tally => {
                self.tally = FieldTree::<Berth>::clone_tree(&other.tally, field, graph)?
            }
        }
        self.field_set(field);
        Ok(())
    }

    fn visit<V: FieldVisitor>(&self, field: CarrierField, visitor: V) -> V::Output {
        match field {
            CarrierField::Fleet => visitor.nested::<Boat, _>(&self.fleet),
            CarrierField::Leases => visitor.nested::<Berth, _>(&self.leases),
            CarrierField::Swaps => visitor.nested::<Berth, _>(&self.swaps),
            CarrierField::Tally => visitor.nested::<Berth, _>(&self.tally),
            _ => visitor.scalar(),
        }
    }

    fn visit_mut<V: FieldVisitorMut>(
        &mut self,
        field: CarrierField,
        other: Option<&Self>,
        visitor: V,
    ) -> V::Output {
        match field {
            CarrierField::Fleet => {
                visitor.nested::<Boat, _>(&mut self.fleet, other.map(|other| &other.fleet))
            }
            CarrierField::Leases => {
                visitor.nested::<Berth, _>(&mut self.leases, other.map(|other| &other.leases))
            }
            CarrierField::Swaps => {
                visitor.nested::<Berth, _>(&mut self.swaps, other.map(|other| &other.swaps))
            }
            CarrierField::Tally => {
                visitor.nested::<Berth, _>(&mut self.tally, other.map(|other| &other.tally))
            }
            _ => visitor.scalar(),
        }
    }
}

impl Entity for Carrier {
    type Id = u64;

    fn id(&self) -> &u64 {
        &self.id
    }

    fn reference_to(id: u64) -> Self {
        Carrier {
            id,
            fields: FieldSet::new(),
            name: String::new(),
            fleet: BTreeMap::new(),
            leases: HashMap::new(),
            swaps: HashMap::new(),
            tally: HashMap::new(),
        }
    }
}
