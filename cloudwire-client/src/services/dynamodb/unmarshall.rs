//! DynamoDB result unmarshallers.

use cloudwire_core::{
    BlobUnmarshaller, BoolUnmarshaller, DateUnmarshaller, DoubleUnmarshaller, ListUnmarshaller,
    LongUnmarshaller, MapUnmarshaller, ParseContext, ParseError, StringUnmarshaller,
    Unmarshaller,
};

use super::model::*;

/// Item attributes: `{"name": {"S": "..."}, ...}`.
pub(crate) const ITEM: MapUnmarshaller<StringUnmarshaller, AttributeValueUnmarshaller> =
    MapUnmarshaller::with_string_keys(AttributeValueUnmarshaller);

pub struct AttributeValueUnmarshaller;

impl Unmarshaller for AttributeValueUnmarshaller {
    type Output = AttributeValue;

    fn unmarshall(&self, ctx: &mut ParseContext) -> Result<Option<AttributeValue>, ParseError> {
        ctx.read_object::<AttributeValue, _>(|out, field, ctx| {
            match field {
                "S" => out.s = StringUnmarshaller.unmarshall(ctx)?,
                "N" => out.n = StringUnmarshaller.unmarshall(ctx)?,
                "B" => out.b = BlobUnmarshaller.unmarshall(ctx)?,
                "SS" => out.ss = ListUnmarshaller(StringUnmarshaller).unmarshall(ctx)?,
                "NS" => out.ns = ListUnmarshaller(StringUnmarshaller).unmarshall(ctx)?,
                "BS" => out.bs = ListUnmarshaller(BlobUnmarshaller).unmarshall(ctx)?,
                "M" => out.m = ITEM.unmarshall(ctx)?,
                "L" => out.l = ListUnmarshaller(AttributeValueUnmarshaller).unmarshall(ctx)?,
                "NULL" => out.null = BoolUnmarshaller.unmarshall(ctx)?,
                "BOOL" => out.bool = BoolUnmarshaller.unmarshall(ctx)?,
                _ => {}
            }
            Ok(())
        })
    }
}

pub struct AttributeDefinitionUnmarshaller;

impl Unmarshaller for AttributeDefinitionUnmarshaller {
    type Output = AttributeDefinition;

    fn unmarshall(&self, ctx: &mut ParseContext) -> Result<Option<AttributeDefinition>, ParseError> {
        ctx.read_object::<AttributeDefinition, _>(|out, field, ctx| {
            match field {
                "AttributeName" => out.attribute_name = StringUnmarshaller.unmarshall(ctx)?,
                "AttributeType" => out.attribute_type = StringUnmarshaller.unmarshall(ctx)?,
                _ => {}
            }
            Ok(())
        })
    }
}

pub struct KeySchemaElementUnmarshaller;

impl Unmarshaller for KeySchemaElementUnmarshaller {
    type Output = KeySchemaElement;

    fn unmarshall(&self, ctx: &mut ParseContext) -> Result<Option<KeySchemaElement>, ParseError> {
        ctx.read_object::<KeySchemaElement, _>(|out, field, ctx| {
            match field {
                "AttributeName" => out.attribute_name = StringUnmarshaller.unmarshall(ctx)?,
                "KeyType" => out.key_type = StringUnmarshaller.unmarshall(ctx)?,
                _ => {}
            }
            Ok(())
        })
    }
}

pub struct ProvisionedThroughputDescriptionUnmarshaller;

impl Unmarshaller for ProvisionedThroughputDescriptionUnmarshaller {
    type Output = ProvisionedThroughputDescription;

    fn unmarshall(
        &self,
        ctx: &mut ParseContext,
    ) -> Result<Option<ProvisionedThroughputDescription>, ParseError> {
        ctx.read_object::<ProvisionedThroughputDescription, _>(|out, field, ctx| {
            match field {
                "LastIncreaseDateTime" => {
                    out.last_increase_date_time = DateUnmarshaller.unmarshall(ctx)?
                }
                "LastDecreaseDateTime" => {
                    out.last_decrease_date_time = DateUnmarshaller.unmarshall(ctx)?
                }
                "NumberOfDecreasesToday" => {
                    out.number_of_decreases_today = LongUnmarshaller.unmarshall(ctx)?
                }
                "ReadCapacityUnits" => out.read_capacity_units = LongUnmarshaller.unmarshall(ctx)?,
                "WriteCapacityUnits" => {
                    out.write_capacity_units = LongUnmarshaller.unmarshall(ctx)?
                }
                _ => {}
            }
            Ok(())
        })
    }
}

pub struct TableDescriptionUnmarshaller;

impl Unmarshaller for TableDescriptionUnmarshaller {
    type Output = TableDescription;

    fn unmarshall(&self, ctx: &mut ParseContext) -> Result<Option<TableDescription>, ParseError> {
        ctx.read_object::<TableDescription, _>(|out, field, ctx| {
            match field {
                "AttributeDefinitions" => {
                    out.attribute_definitions =
                        ListUnmarshaller(AttributeDefinitionUnmarshaller).unmarshall(ctx)?
                }
                "TableName" => out.table_name = StringUnmarshaller.unmarshall(ctx)?,
                "KeySchema" => {
                    out.key_schema = ListUnmarshaller(KeySchemaElementUnmarshaller).unmarshall(ctx)?
                }
                "TableStatus" => out.table_status = StringUnmarshaller.unmarshall(ctx)?,
                "CreationDateTime" => out.creation_date_time = DateUnmarshaller.unmarshall(ctx)?,
                "ProvisionedThroughput" => {
                    out.provisioned_throughput =
                        ProvisionedThroughputDescriptionUnmarshaller.unmarshall(ctx)?
                }
                "TableSizeBytes" => out.table_size_bytes = LongUnmarshaller.unmarshall(ctx)?,
                "ItemCount" => out.item_count = LongUnmarshaller.unmarshall(ctx)?,
                _ => {}
            }
            Ok(())
        })
    }
}

pub struct ConsumedCapacityUnmarshaller;

impl Unmarshaller for ConsumedCapacityUnmarshaller {
    type Output = ConsumedCapacity;

    fn unmarshall(&self, ctx: &mut ParseContext) -> Result<Option<ConsumedCapacity>, ParseError> {
        ctx.read_object::<ConsumedCapacity, _>(|out, field, ctx| {
            match field {
                "TableName" => out.table_name = StringUnmarshaller.unmarshall(ctx)?,
                "CapacityUnits" => out.capacity_units = DoubleUnmarshaller.unmarshall(ctx)?,
                _ => {}
            }
            Ok(())
        })
    }
}

pub struct CreateTableResultUnmarshaller;

impl Unmarshaller for CreateTableResultUnmarshaller {
    type Output = CreateTableResult;

    fn unmarshall(&self, ctx: &mut ParseContext) -> Result<Option<CreateTableResult>, ParseError> {
        ctx.read_object::<CreateTableResult, _>(|out, field, ctx| {
            if field == "TableDescription" {
                out.table_description = TableDescriptionUnmarshaller.unmarshall(ctx)?;
            }
            Ok(())
        })
    }
}

pub struct DescribeTableResultUnmarshaller;

impl Unmarshaller for DescribeTableResultUnmarshaller {
    type Output = DescribeTableResult;

    fn unmarshall(&self, ctx: &mut ParseContext) -> Result<Option<DescribeTableResult>, ParseError> {
        ctx.read_object::<DescribeTableResult, _>(|out, field, ctx| {
            if field == "Table" {
                out.table = TableDescriptionUnmarshaller.unmarshall(ctx)?;
            }
            Ok(())
        })
    }
}

pub struct GetItemResultUnmarshaller;

impl Unmarshaller for GetItemResultUnmarshaller {
    type Output = GetItemResult;

    fn unmarshall(&self, ctx: &mut ParseContext) -> Result<Option<GetItemResult>, ParseError> {
        ctx.read_object::<GetItemResult, _>(|out, field, ctx| {
            match field {
                "Item" => out.item = ITEM.unmarshall(ctx)?,
                "ConsumedCapacity" => {
                    out.consumed_capacity = ConsumedCapacityUnmarshaller.unmarshall(ctx)?
                }
                _ => {}
            }
            Ok(())
        })
    }
}

pub struct PutItemResultUnmarshaller;

impl Unmarshaller for PutItemResultUnmarshaller {
    type Output = PutItemResult;

    fn unmarshall(&self, ctx: &mut ParseContext) -> Result<Option<PutItemResult>, ParseError> {
        ctx.read_object::<PutItemResult, _>(|out, field, ctx| {
            match field {
                "Attributes" => out.attributes = ITEM.unmarshall(ctx)?,
                "ConsumedCapacity" => {
                    out.consumed_capacity = ConsumedCapacityUnmarshaller.unmarshall(ctx)?
                }
                _ => {}
            }
            Ok(())
        })
    }
}

pub struct ListTablesResultUnmarshaller;

impl Unmarshaller for ListTablesResultUnmarshaller {
    type Output = ListTablesResult;

    fn unmarshall(&self, ctx: &mut ParseContext) -> Result<Option<ListTablesResult>, ParseError> {
        ctx.read_object::<ListTablesResult, _>(|out, field, ctx| {
            match field {
                "TableNames" => {
                    out.table_names = ListUnmarshaller(StringUnmarshaller).unmarshall(ctx)?
                }
                "LastEvaluatedTableName" => {
                    out.last_evaluated_table_name = StringUnmarshaller.unmarshall(ctx)?
                }
                _ => {}
            }
            Ok(())
        })
    }
}
