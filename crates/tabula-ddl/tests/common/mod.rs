#![allow(dead_code)]

use tabula_ddl::prelude::*;

/// A phpMyAdmin-style dump with comments, DML and three related tables.
pub const SHOP_DUMP: &str = r"
-- Host: localhost    Database: shop
/*!40101 SET NAMES utf8mb4 */;

DROP TABLE IF EXISTS `users`;
CREATE TABLE `users` (
  `id` BIGINT NOT NULL AUTO_INCREMENT,
  `email` VARCHAR(255) NOT NULL COMMENT 'login, unique',
  `display_name` VARCHAR(100) DEFAULT NULL,
  `is_active` TINYINT(1) NOT NULL DEFAULT '1',
  `created_at` TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
  PRIMARY KEY (`id`),
  UNIQUE KEY `uk_users_email` (`email`)
) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4;

INSERT INTO `users` VALUES (1,'a@example.com','A',1,'2024-01-01 00:00:00');

-- CREATE TABLE `legacy_users` (`id` INT);

CREATE TABLE IF NOT EXISTS `shop`.`products` (
  `id` INT NOT NULL AUTO_INCREMENT,
  `sku` VARCHAR(32) NOT NULL,
  `price` DECIMAL(10,2) NOT NULL DEFAULT '0.00',
  `description` TEXT,
  `attributes` JSON,
  PRIMARY KEY (`id`),
  KEY `idx_products_sku` (`sku`(8))
);

CREATE TABLE `orders` (
  `id` BIGINT NOT NULL AUTO_INCREMENT,
  `user_id` BIGINT NOT NULL,
  `product_id` INT DEFAULT NULL,
  `ordered_on` DATE NOT NULL,
  `note` VARCHAR(255) DEFAULT 'n/a' COMMENT 'free text, optional',
  PRIMARY KEY (`id`),
  CONSTRAINT `fk_orders_user` FOREIGN KEY (`user_id`) REFERENCES `users` (`id`) ON UPDATE CASCADE ON DELETE RESTRICT,
  CONSTRAINT `fk_orders_product` FOREIGN KEY (`product_id`) REFERENCES `products` (`id`) ON DELETE SET NULL
);
";

pub fn parse_one(sql: &str) -> TableDefinition {
    parse_create_table(sql).unwrap_or_else(|e| panic!("Failed to parse: {sql}\nError: {e:?}"))
}

pub fn table<'a>(tables: &'a [TableDefinition], name: &str) -> &'a TableDefinition {
    tables
        .iter()
        .find(|t| t.table_name == name)
        .unwrap_or_else(|| panic!("Table {name} not parsed"))
}

pub fn column<'a>(table: &'a TableDefinition, name: &str) -> &'a ColumnDefinition {
    table
        .find_column(name)
        .unwrap_or_else(|| panic!("Column {name} not found in {}", table.table_name))
}

/// Live state matching what MySQL reports for `table` after creating it.
pub fn live_columns_for(table: &TableDefinition) -> Vec<LiveColumn> {
    table
        .columns
        .iter()
        .map(|c| {
            let mut live = LiveColumn::new(&c.name, c.full_type().to_ascii_lowercase());
            live.nullable = table.effective_nullable(c);
            if c.auto_increment {
                live = live.extra("auto_increment");
            }
            live
        })
        .collect()
}
