use prost::Message;
use prost_types::field_descriptor_proto::{Label, Type};
use prost_types::{
    DescriptorProto, EnumDescriptorProto, EnumValueDescriptorProto, FieldDescriptorProto,
    FileDescriptorProto, FileDescriptorSet, MethodDescriptorProto, ServiceDescriptorProto,
};
use proto_graphene_codegen::{
    find_method, generate, generate_for_state, pool_from_bytes, CodegenConfig, Error,
    GenerationState, OverrideMap,
};
use std::path::Path;

fn field(name: &str, number: i32, ty: Type) -> FieldDescriptorProto {
    FieldDescriptorProto {
        name: Some(name.to_string()),
        number: Some(number),
        label: Some(Label::Optional as i32),
        r#type: Some(ty as i32),
        ..Default::default()
    }
}

/// `pkg.Color { RED, GREEN }`, `pkg.Point { int32 x; int64 y }`, `pkg.Empty`
/// and `pkg.PointService.GetPoint(Empty) -> Point`.
fn descriptor_set() -> Vec<u8> {
    let file = FileDescriptorProto {
        name: Some("service.proto".to_string()),
        package: Some("pkg".to_string()),
        syntax: Some("proto2".to_string()),
        enum_type: vec![EnumDescriptorProto {
            name: Some("Color".to_string()),
            value: ["RED", "GREEN"]
                .iter()
                .enumerate()
                .map(|(i, v)| EnumValueDescriptorProto {
                    name: Some(v.to_string()),
                    number: Some(i as i32),
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        }],
        message_type: vec![
            DescriptorProto {
                name: Some("Point".to_string()),
                field: vec![field("x", 1, Type::Int32), field("y", 2, Type::Int64)],
                ..Default::default()
            },
            DescriptorProto {
                name: Some("Empty".to_string()),
                ..Default::default()
            },
        ],
        service: vec![ServiceDescriptorProto {
            name: Some("PointService".to_string()),
            method: vec![MethodDescriptorProto {
                name: Some("GetPoint".to_string()),
                input_type: Some(".pkg.Empty".to_string()),
                output_type: Some(".pkg.Point".to_string()),
                ..Default::default()
            }],
            ..Default::default()
        }],
        ..Default::default()
    };

    FileDescriptorSet { file: vec![file] }.encode_to_vec()
}

fn sample_state(pool: &prost_reflect::DescriptorPool) -> GenerationState {
    let mut state = GenerationState::new();
    state.add_enum(pool.get_enum_by_name("pkg.Color").unwrap());
    state.add_type(pool.get_message_by_name("pkg.Point").unwrap());
    state.add_input(pool.get_message_by_name("pkg.Empty").unwrap());
    state.add_query(find_method(pool, "pkg.PointService.GetPoint").unwrap());
    state
}

const EXPECTED: &str = "\
import graphene
import protos.service_pb2
import server.handlers
from server.graphql import graphql_schema_extensions
from server.graphql.graphql_custom_scalars import LongString
from utils.proto_json_utils import parse_dict


class PkgColor(graphene.Enum):
    RED = 'RED'
    GREEN = 'GREEN'


class PkgPoint(graphene.ObjectType):
    x = graphene.Int()
    y = LongString()


class PkgEmptyInput(graphene.InputObjectType):
    dummy = graphene.Boolean(description='Dummy field required because GraphQL does not support empty types.')


class QueryType(graphene.ObjectType):
    pkg_get_point = graphene.Field(PkgPoint, input=PkgEmptyInput())

    def resolve_pkg_get_point(self, info, input):
        input_dict = vars(input)
        request_message = protos.service_pb2.Empty()
        parse_dict(input_dict, request_message)
        return server.handlers.get_point_impl(request_message)


class MutationType(graphene.ObjectType):
    dummy = graphene.Boolean(description='Dummy field required because GraphQL does not support empty types.')
";

#[test]
fn test_end_to_end_point_schema() {
    let pool = pool_from_bytes(&descriptor_set()).unwrap();
    let overrides = OverrideMap::empty("graphql_schema_extensions");
    let source =
        generate_for_state(&sample_state(&pool), &overrides, &CodegenConfig::default()).unwrap();

    assert_eq!(source, EXPECTED);
}

#[test]
fn test_generation_is_byte_identical_across_runs() {
    let overrides = OverrideMap::empty("graphql_schema_extensions");
    let config = CodegenConfig::default();

    let runs: Vec<String> = (0..3)
        .map(|_| {
            let pool = pool_from_bytes(&descriptor_set()).unwrap();
            generate_for_state(&sample_state(&pool), &overrides, &config).unwrap()
        })
        .collect();

    assert_eq!(runs[0], runs[1]);
    assert_eq!(runs[1], runs[2]);
}

#[test]
fn test_generate_from_config_computes_closure() {
    let dir = tempfile::tempdir().unwrap();
    let ext = dir.path().join("graphql_schema_extensions.py");
    std::fs::write(
        &ext,
        "import graphene\n\nclass PointExtension(PkgPoint):\n    norm = graphene.Float()\n",
    )
    .unwrap();

    let pool = pool_from_bytes(&descriptor_set()).unwrap();
    let config = CodegenConfig {
        extensions: Some(ext),
        queries: vec!["pkg.PointService.GetPoint".to_string()],
        ..CodegenConfig::default()
    };
    let source = generate(&pool, &config).unwrap();

    // Color is not reachable from GetPoint, so the closure leaves it out.
    assert!(!source.contains("PkgColor"));
    assert!(source.contains("\nclass PkgPoint(graphene.ObjectType):"));
    assert!(source.contains("\nclass PkgEmptyInput(graphene.InputObjectType):"));
    assert!(source.contains("pkg_get_point = graphene.Field(PkgPoint, input=PkgEmptyInput())"));
}

#[test]
fn test_duplicate_extension_aborts_generation() {
    let dir = tempfile::tempdir().unwrap();
    let ext = dir.path().join("graphql_schema_extensions.py");
    std::fs::write(
        &ext,
        "class A(PkgPoint):\n    pass\n\n\nclass B(PkgPoint):\n    pass\n",
    )
    .unwrap();

    let pool = pool_from_bytes(&descriptor_set()).unwrap();
    let config = CodegenConfig {
        extensions: Some(ext.clone()),
        queries: vec!["pkg.PointService.GetPoint".to_string()],
        ..CodegenConfig::default()
    };

    match generate(&pool, &config).unwrap_err() {
        Error::DuplicateExtension { base, file } => {
            assert_eq!(base, "PkgPoint");
            assert_eq!(file, ext);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_override_resolution_contract() {
    let source = "class PointExtension(PkgPoint):\n    pass\n";
    let overrides =
        OverrideMap::from_source(source, Path::new("graphql_schema_extensions.py"), "ext").unwrap();

    assert_eq!(overrides.resolve("PkgPoint"), "PointExtension");
    assert_eq!(overrides.resolve("PkgColor"), "PkgColor");
}
