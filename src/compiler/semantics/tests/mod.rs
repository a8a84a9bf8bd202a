mod type_rules;
