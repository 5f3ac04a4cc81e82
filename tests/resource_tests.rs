//! End-to-end tests driving the public API the way a caller would: parse a
//! full record from XML text, build one programmatically through the
//! builders, and check that the two paths agree.

use ddms::components::{
    ComponentBuilder, DdmsComponent, Resource, ResourceBuilder, SubjectCoverage,
};
use ddms::elements::Element;
use ddms::{Context, DdmsVersion};
use pretty_assertions::assert_eq;
use std::collections::HashSet;

const DDMS_31: &str = "http://metadata.dod.mil/mdr/ns/DDMS/3.1/";
const ISM: &str = "urn:us:gov:ic:ism";

fn ctx(version: &str) -> Context {
    let mut ctx = Context::new().unwrap();
    ctx.set_current_version(version).unwrap();
    ctx
}

fn record_3_1() -> String {
    format!(
        "<ddms:Resource xmlns:ddms=\"{ddms}\" xmlns:ism=\"{ism}\" \
         ism:resourceElement=\"true\" ism:createDate=\"2010-01-21\" ism:DESVersion=\"2\" \
         ism:classification=\"U\" ism:ownerProducer=\"USA\">\
         <ddms:identifier ddms:qualifier=\"URI\" ddms:value=\"urn:buri:ddmsence:testIdentifier\" />\
         <ddms:title ism:classification=\"U\" ism:ownerProducer=\"USA\">DDMSence</ddms:title>\
         <ddms:language ddms:qualifier=\"http://purl.org/dc/elements/1.1/language\" \
         ddms:value=\"en\" />\
         <ddms:dates ddms:created=\"2003\" />\
         <ddms:rights ddms:privacyAct=\"true\" />\
         <ddms:subjectCoverage><ddms:Subject>\
         <ddms:keyword ddms:value=\"DDMSence\" />\
         </ddms:Subject></ddms:subjectCoverage>\
         <ddms:security ism:excludeFromRollup=\"true\" ism:classification=\"U\" \
         ism:ownerProducer=\"USA\" />\
         </ddms:Resource>",
        ddms = DDMS_31,
        ism = ISM,
    )
}

fn parse_3_1(ctx: &Context) -> Resource {
    Resource::from_element(ctx, Element::parse(&record_3_1()).unwrap()).unwrap()
}

#[test]
fn parse_full_record() {
    let ctx = ctx("3.1");
    let resource = parse_3_1(&ctx);

    assert_eq!(resource.version(), DdmsVersion::for_version("3.1").unwrap());
    assert_eq!(resource.qualified_name(), "ddms:Resource");
    assert_eq!(resource.resource_element(), Some(true));
    assert_eq!(resource.des_version(), Some(2));

    assert_eq!(resource.identifiers().len(), 1);
    assert_eq!(resource.identifiers()[0].qualifier(), "URI");
    assert_eq!(resource.titles()[0].value(), "DDMSence");
    assert_eq!(
        resource.languages()[0].qualifier(),
        "http://purl.org/dc/elements/1.1/language"
    );
    assert_eq!(resource.dates().unwrap().created(), "2003");
    assert!(resource.rights().unwrap().privacy_act());
    assert_eq!(resource.subject_coverage().keywords().len(), 1);
    assert_eq!(resource.security().exclude_from_rollup(), Some(true));
    assert!(resource.validation_warnings().is_empty());
}

#[test]
fn record_version_comes_from_the_namespace() {
    // A parsed record belongs to the namespace it was written in, whatever
    // the context is currently set to
    let ctx = ctx("4.1");
    let resource = parse_3_1(&ctx);
    assert_eq!(resource.version().version(), "3.1");
}

#[test]
fn parse_rejects_vocabulary_violations() {
    let ctx = ctx("3.1");
    let bad = record_3_1().replace(
        "ism:classification=\"U\" ism:ownerProducer=\"USA\">\
         <ddms:identifier",
        "ism:classification=\"SuperSecret\" ism:ownerProducer=\"USA\">\
         <ddms:identifier",
    );
    let err = Resource::from_element(&ctx, Element::parse(&bad).unwrap()).unwrap_err();
    assert!(err.to_string().contains(
        "SuperSecret is not a valid enumeration token for this attribute, \
         as specified in CVEnumISMClassificationAll.xml."
    ));
}

#[test]
fn parse_rejects_missing_mandatory_child() {
    let ctx = ctx("3.1");
    let bad = record_3_1().replace(
        "<ddms:subjectCoverage><ddms:Subject>\
         <ddms:keyword ddms:value=\"DDMSence\" />\
         </ddms:Subject></ddms:subjectCoverage>",
        "",
    );
    let err = Resource::from_element(&ctx, Element::parse(&bad).unwrap()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid DDMS content: Exactly 1 subjectCoverage element must exist. \
         (locator: ddms:Resource)"
    );
}

#[test]
fn duplicate_keywords_warn_with_a_full_locator_path() {
    let ctx = ctx("3.1");
    let noisy = record_3_1().replace(
        "<ddms:keyword ddms:value=\"DDMSence\" />",
        "<ddms:keyword ddms:value=\"DDMSence\" /><ddms:keyword ddms:value=\"DDMSence\" />",
    );
    let resource = Resource::from_element(&ctx, Element::parse(&noisy).unwrap()).unwrap();
    assert_eq!(resource.validation_warnings().len(), 1);
    assert_eq!(
        resource.validation_warnings()[0].text,
        "1 or more keywords have the same value."
    );
    assert_eq!(
        resource.validation_warnings()[0].locator,
        "ddms:Resource/ddms:subjectCoverage/ddms:Subject"
    );
}

#[test]
fn text_output_flattens_the_whole_record() {
    let ctx = ctx("3.1");
    let text = parse_3_1(&ctx).to_text();
    assert!(text.starts_with("Resource.resourceElement: true\n"));
    assert!(text.contains("Resource.createDate: 2010-01-21\n"));
    assert!(text.contains("Resource.identifier.value: urn:buri:ddmsence:testIdentifier\n"));
    assert!(text.contains("Resource.title: DDMSence\n"));
    assert!(text.contains("Resource.language.value: en\n"));
    // The pre-4.0.1 Subject wrapper shows up in the flattened names
    assert!(text.contains("Resource.subjectCoverage.Subject.keyword: DDMSence\n"));
    assert!(text.contains("Resource.security.excludeFromRollup: true\n"));
}

#[test]
fn html_output_renders_meta_tags() {
    let ctx = ctx("3.1");
    let html = parse_3_1(&ctx).to_html();
    assert!(html.contains("<meta name=\"Resource.title\" content=\"DDMSence\" />"));
    assert!(html.contains(
        "<meta name=\"Resource.identifier.qualifier\" content=\"URI\" />"
    ));
}

#[test]
fn parsed_and_built_records_are_interchangeable() {
    let ctx = ctx("3.1");
    let parsed = parse_3_1(&ctx);
    let rebuilt = ResourceBuilder::from_resource(&parsed)
        .commit(&ctx)
        .unwrap()
        .unwrap();
    assert_eq!(rebuilt, parsed);

    let mut set = HashSet::new();
    set.insert(parsed);
    set.insert(rebuilt);
    assert_eq!(set.len(), 1);
}

#[test]
fn builder_from_scratch() {
    let ctx = ctx("4.1");
    let mut builder = ResourceBuilder::default();
    builder.security_attributes.classification = "U".to_string();
    builder.security_attributes.owner_producers = vec!["USA".to_string()];
    builder.create_date = "2011-09-25".to_string();
    builder.des_version = Some(9);

    {
        let identifier = builder.push_identifier();
        identifier.qualifier = "URI".to_string();
        identifier.value = "urn:buri:ddmsence:testIdentifier".to_string();
    }
    {
        let title = builder.push_title();
        title.value = "DDMSence".to_string();
        title.security_attributes.classification = "U".to_string();
        title.security_attributes.owner_producers = vec!["USA".to_string()];
    }
    builder.subject_coverage.push_keyword().value = "DDMSence".to_string();
    builder.security.security_attributes.classification = "U".to_string();
    builder.security.security_attributes.owner_producers = vec!["USA".to_string()];

    let resource = builder.commit(&ctx).unwrap().unwrap();
    assert_eq!(resource.qualified_name(), "ddms:resource");
    assert!(resource.validation_warnings().is_empty());
    // No Subject wrapper from 4.0.1 on
    assert!(resource
        .to_text()
        .contains("resource.subjectCoverage.keyword: DDMSence\n"));

    let reparsed =
        Resource::from_element(&ctx, Element::parse(&resource.to_xml()).unwrap()).unwrap();
    assert_eq!(reparsed, resource);
}

#[test]
fn builder_surfaces_child_errors_with_locators() {
    let ctx = ctx("3.1");
    let parsed = parse_3_1(&ctx);
    let mut builder = ResourceBuilder::from_resource(&parsed);
    builder.languages[0].value.clear();
    builder.languages[0].qualifier.clear();
    builder.push_language().value = "fr".to_string();
    let err = builder.commit(&ctx).unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid DDMS content: qualifier attribute is required. (locator: ddms:language)"
    );
}

#[test]
fn empty_child_builders_are_skipped_on_commit() {
    let ctx = ctx("3.1");
    let parsed = parse_3_1(&ctx);
    let mut builder = ResourceBuilder::from_resource(&parsed);
    builder.ensure_languages(4);
    let resource = builder.commit(&ctx).unwrap().unwrap();
    assert_eq!(resource.languages().len(), 1);
    assert_eq!(resource, parsed);
}

#[test]
fn subject_wrapper_required_before_4x() {
    let ctx = ctx("3.1");
    let flat = format!(
        "<ddms:subjectCoverage xmlns:ddms=\"{}\">\
         <ddms:keyword ddms:value=\"DDMSence\" />\
         </ddms:subjectCoverage>",
        DDMS_31
    );
    let err = SubjectCoverage::from_element(&ctx, Element::parse(&flat).unwrap()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid DDMS content: Subject element is required. (locator: ddms:subjectCoverage)"
    );
}

#[test]
fn minimal_2_0_record() {
    let ctx = ctx("2.0");
    let xml = "<ddms:Resource xmlns:ddms=\"http://metadata.dod.mil/mdr/ns/DDMS/2.0/\" \
               xmlns:ism=\"urn:us:gov:ic:ism:v2\">\
               <ddms:identifier ddms:qualifier=\"URI\" ddms:value=\"urn:buri:ddmsence\" />\
               <ddms:title ism:classification=\"U\" ism:ownerProducer=\"USA\">DDMSence\
               </ddms:title>\
               <ddms:subjectCoverage><ddms:Subject>\
               <ddms:keyword ddms:value=\"DDMSence\" />\
               </ddms:Subject></ddms:subjectCoverage>\
               <ddms:security ism:classification=\"U\" ism:ownerProducer=\"USA\" />\
               </ddms:Resource>";
    let resource = Resource::from_element(&ctx, Element::parse(xml).unwrap()).unwrap();
    assert_eq!(resource.version().version(), "2.0");
    assert_eq!(resource.resource_element(), None);
    assert_eq!(resource.create_date(), None);
    assert_eq!(resource.security().exclude_from_rollup(), None);
}
