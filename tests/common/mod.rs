//! Shared fixtures: a small catalog of recording-metadata container types
//! and the namespace of specifications governing them

#![allow(dead_code)]

use std::any::Any;
use std::rc::Rc;

use serde_json::{Value, json};
use uuid::Uuid;

use neurodata_mapper::{
    AttributeSpec, Container, DataType, DatasetSpec, FieldValue, LinkSpec, Namespace,
    NamespaceRegistry, TypeCatalog, TypeSpec,
};

pub const CORE_NAMESPACE: &str = "core";

// ---------------------------------------------------------------------------
// containers

pub struct Device {
    pub id: Uuid,
    pub name: String,
    pub source: String,
}

impl Device {
    pub fn new(name: &str, source: &str) -> Rc<Self> {
        Rc::new(Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            source: source.to_string(),
        })
    }
}

impl Container for Device {
    fn id(&self) -> Uuid {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "source" => Some(FieldValue::Value(json!(self.source))),
            _ => None,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub struct ElectrodeGroup {
    pub id: Uuid,
    pub name: String,
    pub source: String,
    pub channel_description: Vec<String>,
    pub channel_location: Vec<String>,
    pub channel_filtering: Vec<String>,
    pub channel_coordinates: Vec<String>,
    pub channel_impedance: Vec<String>,
    pub description: String,
    pub location: String,
    pub device: Rc<dyn Container>,
}

impl ElectrodeGroup {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: &str,
        source: &str,
        channel_description: Vec<String>,
        channel_location: Vec<String>,
        channel_filtering: Vec<String>,
        channel_coordinates: Vec<String>,
        channel_impedance: Vec<String>,
        description: &str,
        location: &str,
        device: Rc<dyn Container>,
    ) -> Rc<Self> {
        Rc::new(Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            source: source.to_string(),
            channel_description,
            channel_location,
            channel_filtering,
            channel_coordinates,
            channel_impedance,
            description: description.to_string(),
            location: location.to_string(),
            device,
        })
    }
}

impl Container for ElectrodeGroup {
    fn id(&self) -> Uuid {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "source" => Some(FieldValue::Value(json!(self.source))),
            "channel_description" => Some(FieldValue::Value(json!(self.channel_description))),
            "channel_location" => Some(FieldValue::Value(json!(self.channel_location))),
            "channel_filtering" => Some(FieldValue::Value(json!(self.channel_filtering))),
            "channel_coordinates" => Some(FieldValue::Value(json!(self.channel_coordinates))),
            "channel_impedance" => Some(FieldValue::Value(json!(self.channel_impedance))),
            "description" => Some(FieldValue::Value(json!(self.description))),
            "location" => Some(FieldValue::Value(json!(self.location))),
            "device" => Some(FieldValue::Container(self.device.clone())),
            _ => None,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub struct ElectricalSeries {
    pub id: Uuid,
    pub name: String,
    pub source: String,
    pub comments: String,
    pub description: String,
    pub data: Value,
    pub unit: String,
    pub conversion: f64,
    pub resolution: f64,
    pub timestamps: Vec<f64>,
    pub electrode_group: Rc<dyn Container>,
}

impl ElectricalSeries {
    pub fn new(
        name: &str,
        source: &str,
        data: Vec<(i64, i64)>,
        electrode_group: Rc<dyn Container>,
        timestamps: Vec<f64>,
    ) -> Rc<Self> {
        Rc::new(Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            source: source.to_string(),
            comments: "no comments".to_string(),
            description: "no description".to_string(),
            data: json!(data),
            unit: "volt".to_string(),
            conversion: 1.0,
            resolution: 0.0,
            timestamps,
            electrode_group,
        })
    }
}

impl Container for ElectricalSeries {
    fn id(&self) -> Uuid {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "source" => Some(FieldValue::Value(json!(self.source))),
            "comments" => Some(FieldValue::Value(json!(self.comments))),
            "description" => Some(FieldValue::Value(json!(self.description))),
            "data" => Some(FieldValue::Value(self.data.clone())),
            "unit" => Some(FieldValue::Value(json!(self.unit))),
            "conversion" => Some(FieldValue::Value(json!(self.conversion))),
            "resolution" => Some(FieldValue::Value(json!(self.resolution))),
            "timestamps" => Some(FieldValue::Value(json!(self.timestamps))),
            "electrode_group" => Some(FieldValue::Container(self.electrode_group.clone())),
            _ => None,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub struct Clustering {
    pub id: Uuid,
    pub name: String,
    pub source: String,
    pub description: String,
    pub num: Vec<i64>,
    pub peak_over_rms: Vec<f64>,
    pub times: Vec<i64>,
}

impl Clustering {
    pub fn new(
        source: &str,
        description: &str,
        num: Vec<i64>,
        peak_over_rms: Vec<f64>,
        times: Vec<i64>,
    ) -> Rc<Self> {
        Rc::new(Self {
            id: Uuid::new_v4(),
            name: "Clustering".to_string(),
            source: source.to_string(),
            description: description.to_string(),
            num,
            peak_over_rms,
            times,
        })
    }
}

impl Container for Clustering {
    fn id(&self) -> Uuid {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "source" => Some(FieldValue::Value(json!(self.source))),
            "description" => Some(FieldValue::Value(json!(self.description))),
            "num" => Some(FieldValue::Value(json!(self.num))),
            "peak_over_rms" => Some(FieldValue::Value(json!(self.peak_over_rms))),
            "times" => Some(FieldValue::Value(json!(self.times))),
            _ => None,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A single-array (dataset-kinded) type
pub struct EventTimes {
    pub id: Uuid,
    pub name: String,
    pub source: String,
    pub data: Vec<f64>,
}

impl EventTimes {
    pub fn new(name: &str, source: &str, data: Vec<f64>) -> Rc<Self> {
        Rc::new(Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            source: source.to_string(),
            data,
        })
    }
}

impl Container for EventTimes {
    fn id(&self) -> Uuid {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "source" => Some(FieldValue::Value(json!(self.source))),
            "data" => Some(FieldValue::Value(json!(self.data))),
            _ => None,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// ---------------------------------------------------------------------------
// specifications

pub fn core_namespace() -> Namespace {
    let channel_dataset = |name: &str| {
        DatasetSpec::new(name)
            .with_dtype(DataType::Text)
            .with_shape(vec![None])
    };

    Namespace::new(CORE_NAMESPACE)
        .with_doc("recording metadata types")
        .with_type(
            TypeSpec::new("Device")
                .with_help("A recording device e.g. amplifier")
                .with_attribute(AttributeSpec::new("source").with_dtype(DataType::Text)),
        )
        .with_type(
            TypeSpec::new("ElectrodeGroup")
                .with_help("A physical grouping of channels")
                .with_attribute(AttributeSpec::new("source").with_dtype(DataType::Text))
                .with_dataset(channel_dataset("channel_description"))
                .with_dataset(channel_dataset("channel_location"))
                .with_dataset(channel_dataset("channel_filtering"))
                .with_dataset(channel_dataset("channel_coordinates"))
                .with_dataset(channel_dataset("channel_impedance"))
                .with_dataset(DatasetSpec::new("description").with_dtype(DataType::Text))
                .with_dataset(DatasetSpec::new("location").with_dtype(DataType::Text))
                .with_link(LinkSpec::new("device", "Device")),
        )
        .with_type(
            TypeSpec::new("TimeSeries")
                .with_help("General purpose time series")
                .with_attribute(AttributeSpec::new("source").with_dtype(DataType::Text))
                .with_attribute(
                    AttributeSpec::new("comments")
                        .with_dtype(DataType::Text)
                        .with_default(json!("no comments")),
                )
                .with_attribute(
                    AttributeSpec::new("description")
                        .with_dtype(DataType::Text)
                        .with_default(json!("no description")),
                )
                .with_dataset(
                    DatasetSpec::new("data")
                        .with_shape(vec![None])
                        .with_attribute(AttributeSpec::new("unit").with_dtype(DataType::Text))
                        .with_attribute(
                            AttributeSpec::new("conversion")
                                .with_dtype(DataType::Float)
                                .with_default(json!(1.0)),
                        )
                        .with_attribute(
                            AttributeSpec::new("resolution")
                                .with_dtype(DataType::Float)
                                .with_default(json!(0.0)),
                        ),
                )
                .with_dataset(
                    DatasetSpec::new("timestamps")
                        .with_dtype(DataType::Float)
                        .with_shape(vec![None])
                        .with_attribute(
                            AttributeSpec::new("unit")
                                .with_dtype(DataType::Text)
                                .with_value(json!("Seconds")),
                        )
                        .with_attribute(
                            AttributeSpec::new("interval")
                                .with_dtype(DataType::Int)
                                .with_value(json!(1)),
                        ),
                ),
        )
        .with_type(
            TypeSpec::new("ElectricalSeries")
                .with_parent("TimeSeries")
                .with_help("Stores acquired voltage data from extracellular recordings")
                .with_dataset(
                    DatasetSpec::new("data")
                        .with_dtype(DataType::Int)
                        .with_shape(vec![None, Some(2)])
                        .with_attribute(AttributeSpec::new("unit").with_dtype(DataType::Text))
                        .with_attribute(
                            AttributeSpec::new("conversion")
                                .with_dtype(DataType::Float)
                                .with_default(json!(1.0)),
                        )
                        .with_attribute(
                            AttributeSpec::new("resolution")
                                .with_dtype(DataType::Float)
                                .with_default(json!(0.0)),
                        ),
                )
                .with_link(LinkSpec::new("electrode_group", "ElectrodeGroup")),
        )
        .with_type(
            TypeSpec::new("Clustering")
                .with_help(
                    "Clustered spike data, whether from automatic clustering tools \
                     (eg, klustakwik) or as a result of manual sorting",
                )
                .with_attribute(AttributeSpec::new("source").with_dtype(DataType::Text))
                .with_dataset(DatasetSpec::new("description").with_dtype(DataType::Text))
                .with_dataset(
                    DatasetSpec::new("num")
                        .with_dtype(DataType::Int)
                        .with_shape(vec![None]),
                )
                .with_dataset(
                    DatasetSpec::new("peak_over_rms")
                        .with_dtype(DataType::Float)
                        .with_shape(vec![None]),
                )
                .with_dataset(
                    DatasetSpec::new("times")
                        .with_dtype(DataType::Float)
                        .with_shape(vec![None]),
                ),
        )
        .with_type(
            TypeSpec::new("EventTimes")
                .dataset_kind(DataType::Float, Some(vec![None]))
                .with_help("Times at which discrete events occurred")
                .with_attribute(AttributeSpec::new("source").with_dtype(DataType::Text))
                .with_attribute(
                    AttributeSpec::new("unit")
                        .with_dtype(DataType::Text)
                        .with_value(json!("Seconds")),
                ),
        )
}

pub fn core_registry() -> NamespaceRegistry {
    let mut registry = NamespaceRegistry::new();
    registry.register_namespace(core_namespace()).unwrap();
    registry
}

// ---------------------------------------------------------------------------
// catalog

pub fn core_catalog() -> TypeCatalog {
    let mut catalog = TypeCatalog::new();

    catalog.register::<Device>(
        CORE_NAMESPACE,
        "Device",
        Box::new(|data| {
            Ok(Rc::new(Device {
                id: Uuid::new_v4(),
                source: data.expect_string("source")?,
                name: data.name,
            }))
        }),
    );

    catalog.register::<ElectrodeGroup>(
        CORE_NAMESPACE,
        "ElectrodeGroup",
        Box::new(|data| {
            Ok(Rc::new(ElectrodeGroup {
                id: Uuid::new_v4(),
                source: data.expect_string("source")?,
                channel_description: data.expect_string_vec("channel_description")?,
                channel_location: data.expect_string_vec("channel_location")?,
                channel_filtering: data.expect_string_vec("channel_filtering")?,
                channel_coordinates: data.expect_string_vec("channel_coordinates")?,
                channel_impedance: data.expect_string_vec("channel_impedance")?,
                description: data.expect_string("description")?,
                location: data.expect_string("location")?,
                device: data.expect_container("device")?,
                name: data.name,
            }))
        }),
    );

    catalog.register::<ElectricalSeries>(
        CORE_NAMESPACE,
        "ElectricalSeries",
        Box::new(|data| {
            Ok(Rc::new(ElectricalSeries {
                id: Uuid::new_v4(),
                source: data.expect_string("source")?,
                comments: data.expect_string("comments")?,
                description: data.expect_string("description")?,
                data: data.expect_value("data")?.clone(),
                unit: data.expect_string("unit")?,
                conversion: data.expect_f64("conversion")?,
                resolution: data.expect_f64("resolution")?,
                timestamps: data.expect_f64_vec("timestamps")?,
                electrode_group: data.expect_container("electrode_group")?,
                name: data.name,
            }))
        }),
    );

    catalog.register::<Clustering>(
        CORE_NAMESPACE,
        "Clustering",
        Box::new(|data| {
            Ok(Rc::new(Clustering {
                id: Uuid::new_v4(),
                source: data.expect_string("source")?,
                description: data.expect_string("description")?,
                num: data.expect_i64_vec("num")?,
                peak_over_rms: data.expect_f64_vec("peak_over_rms")?,
                times: data.expect_i64_vec("times")?,
                name: data.name,
            }))
        }),
    );

    catalog.register::<EventTimes>(
        CORE_NAMESPACE,
        "EventTimes",
        Box::new(|data| {
            Ok(Rc::new(EventTimes {
                id: Uuid::new_v4(),
                source: data.expect_string("source")?,
                data: data.expect_f64_vec("data")?,
                name: data.name,
            }))
        }),
    );

    catalog
}

// ---------------------------------------------------------------------------
// container fixtures matching the scenarios

pub fn sample_device() -> Rc<Device> {
    Device::new("dev1", "a test source")
}

pub fn sample_electrode_group(device: Rc<dyn Container>) -> Rc<ElectrodeGroup> {
    ElectrodeGroup::new(
        "elec1",
        "a test source",
        vec!["ch1".to_string(), "ch2".to_string()],
        vec!["lo1".to_string(), "lo2".to_string()],
        vec!["fi1".to_string(), "fi2".to_string()],
        vec!["co1".to_string(), "co2".to_string()],
        vec!["im1".to_string(), "im2".to_string()],
        "desc1",
        "loc1",
        device,
    )
}

pub fn sample_electrical_series(electrode_group: Rc<dyn Container>) -> Rc<ElectricalSeries> {
    let data: Vec<(i64, i64)> = (0..10).map(|i| (i, i + 10)).collect();
    let timestamps: Vec<f64> = (0..10).map(|i| i as f64 / 10.0).collect();
    ElectricalSeries::new("test_eS", "a hypothetical source", data, electrode_group, timestamps)
}

pub fn sample_clustering() -> Rc<Clustering> {
    Clustering::new(
        "an example source for Clustering",
        "A fake Clustering interface",
        vec![0, 1, 2, 0, 1, 2],
        vec![100.0, 101.0, 102.0],
        (1..=6).map(|i| i * 10).collect(),
    )
}
